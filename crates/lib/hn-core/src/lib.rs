//! Core client and tool dispatch for hn-mcp.
//!
//! This crate talks to the public Hacker News API, fans out item fetches,
//! projects stories and comments into display records, and renders them as
//! text. The control plane maps decoded tool requests onto those pieces.

pub mod client;
pub mod control;
pub mod fetch;
pub mod format;
pub mod models;
pub mod session;
