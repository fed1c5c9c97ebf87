//! Tool dispatch over the upstream client.
//!
//! `HnControlPlane` turns a decoded `ToolRequest` into upstream fetches and a
//! rendered text payload. Session state is passed in by the caller.

use std::{error::Error, fmt};

use crate::client::{ClientConfig, ClientError, HnClient};
use crate::fetch::FetchOptions;
use crate::models::ItemId;
use crate::session::StorySession;

pub mod comments;
pub mod request;
pub mod stories;

pub use request::{CommentTarget, ToolRequest};

#[derive(Debug)]
pub enum DispatchError {
    MissingArgument(&'static str),
    InvalidArgument { name: &'static str, reason: String },
    InvalidIndex { index: usize, available: usize },
    NoSession,
    NotFound(ItemId),
    UnknownOperation(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument(name) => write!(f, "missing required argument: {name}"),
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid argument {name}: {reason}")
            }
            Self::InvalidIndex { index, available } => write!(
                f,
                "invalid story index {index}: the last story list has {available} entries"
            ),
            Self::NoSession => write!(
                f,
                "no story list available; call list-latest, list-top, or list-best first"
            ),
            Self::NotFound(id) => write!(f, "story {id} not found"),
            Self::UnknownOperation(name) => write!(f, "unknown operation: {name}"),
        }
    }
}

impl Error for DispatchError {}

#[derive(Clone)]
pub struct HnControlPlane {
    client: HnClient,
    options: FetchOptions,
}

impl HnControlPlane {
    #[must_use]
    pub const fn new(client: HnClient, options: FetchOptions) -> Self {
        Self { client, options }
    }

    /// Builds a control plane with its own HTTP client.
    ///
    /// # Errors
    /// Returns `ClientError` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, options: FetchOptions) -> Result<Self, ClientError> {
        Ok(Self::new(HnClient::new(config)?, options))
    }

    #[must_use]
    pub const fn client(&self) -> &HnClient {
        &self.client
    }

    /// Runs one decoded request against the upstream API.
    ///
    /// # Errors
    /// Returns `DispatchError` when the target story cannot be resolved or
    /// fetched.
    pub async fn dispatch(
        &self,
        request: ToolRequest,
        session: &StorySession,
    ) -> Result<String, DispatchError> {
        match request {
            ToolRequest::ListStories { category, limit } => {
                Ok(self.list_stories(category, limit, session).await)
            }
            ToolRequest::GetStory { story_id } => self.get_story(story_id).await,
            ToolRequest::GetComments { target } => self.get_comments(target, session).await,
        }
    }
}
