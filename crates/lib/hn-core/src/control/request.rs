//! Decoding of tool arguments into typed requests.
//!
//! Arguments arrive as a loose JSON bag. They are validated once here and the
//! rest of the control plane only sees `ToolRequest`.

use serde_json::{Map, Value};

use crate::client::StoryCategory;
use crate::models::ItemId;

use super::DispatchError;

pub const LIST_LATEST: &str = "list-latest";
pub const LIST_TOP: &str = "list-top";
pub const LIST_BEST: &str = "list-best";
pub const GET_STORY: &str = "get-story";
pub const GET_COMMENTS: &str = "get-comments";

pub const OPERATIONS: [&str; 5] = [LIST_LATEST, LIST_TOP, LIST_BEST, GET_STORY, GET_COMMENTS];

pub const DEFAULT_LIMIT: usize = 10;
/// Documented upper bound for `limit`. Larger values are passed through.
pub const MAX_LIMIT: usize = 50;

/// How `get-comments` picks its story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Id(ItemId),
    /// 1-based position in the session's last story list.
    Index(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRequest {
    ListStories {
        category: StoryCategory,
        limit: usize,
    },
    GetStory {
        story_id: ItemId,
    },
    GetComments {
        target: CommentTarget,
    },
}

impl ToolRequest {
    /// Decodes an operation name and its argument bag.
    ///
    /// # Errors
    /// Returns `DispatchError::UnknownOperation` for unrecognized names and
    /// argument errors for missing or malformed values.
    pub fn decode(name: &str, arguments: &Map<String, Value>) -> Result<Self, DispatchError> {
        match name {
            LIST_LATEST => Self::list(StoryCategory::Latest, arguments.get("limit")),
            LIST_TOP => Self::list(StoryCategory::Top, arguments.get("limit")),
            LIST_BEST => Self::list(StoryCategory::Best, arguments.get("limit")),
            GET_STORY => Self::get_story(arguments.get("story_id")),
            GET_COMMENTS => {
                Self::get_comments(arguments.get("story_id"), arguments.get("story_index"))
            }
            other => Err(DispatchError::UnknownOperation(other.to_string())),
        }
    }

    /// # Errors
    /// Returns `DispatchError::InvalidArgument` if `limit` is not a
    /// non-negative integer.
    pub fn list(category: StoryCategory, limit: Option<&Value>) -> Result<Self, DispatchError> {
        let limit = match present(limit) {
            Some(value) => to_usize("limit", value)?,
            None => DEFAULT_LIMIT,
        };
        Ok(Self::ListStories { category, limit })
    }

    /// # Errors
    /// Returns an argument error if `story_id` is missing or not numeric.
    pub fn get_story(story_id: Option<&Value>) -> Result<Self, DispatchError> {
        let value = present(story_id).ok_or(DispatchError::MissingArgument("story_id"))?;
        Ok(Self::GetStory {
            story_id: coerce_integer("story_id", value)?,
        })
    }

    /// An explicit `story_id` wins over `story_index`.
    ///
    /// # Errors
    /// Returns an argument error if neither is supplied or the chosen one is
    /// malformed.
    pub fn get_comments(
        story_id: Option<&Value>,
        story_index: Option<&Value>,
    ) -> Result<Self, DispatchError> {
        if let Some(value) = present(story_id) {
            let id = coerce_integer("story_id", value)?;
            return Ok(Self::GetComments {
                target: CommentTarget::Id(id),
            });
        }
        if let Some(value) = present(story_index) {
            let index = to_usize("story_index", value)?;
            if index == 0 {
                return Err(DispatchError::InvalidArgument {
                    name: "story_index",
                    reason: "must be at least 1".to_string(),
                });
            }
            return Ok(Self::GetComments {
                target: CommentTarget::Index(index),
            });
        }
        Err(DispatchError::MissingArgument("story_id or story_index"))
    }

    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::ListStories { category, .. } => match category {
                StoryCategory::Latest => LIST_LATEST,
                StoryCategory::Top => LIST_TOP,
                StoryCategory::Best => LIST_BEST,
            },
            Self::GetStory { .. } => GET_STORY,
            Self::GetComments { .. } => GET_COMMENTS,
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

/// Accepts JSON integers and strings holding an integer.
fn coerce_integer(name: &'static str, value: &Value) -> Result<u64, DispatchError> {
    let parsed = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| DispatchError::InvalidArgument {
        name,
        reason: format!("expected a non-negative integer, got {value}"),
    })
}

fn to_usize(name: &'static str, value: &Value) -> Result<usize, DispatchError> {
    let number = coerce_integer(name, value)?;
    usize::try_from(number).map_err(|_| DispatchError::InvalidArgument {
        name,
        reason: format!("{number} is out of range"),
    })
}
