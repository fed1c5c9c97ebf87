//! MCP tool modules.
//!
//! Tools are grouped by domain: story and comment queries, and contextual help.

pub mod stories;
mod context;
