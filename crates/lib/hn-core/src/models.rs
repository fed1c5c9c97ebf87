use serde::{Deserialize, Serialize};

/// Upstream item identifier.
pub type ItemId = u64;

/// Raw upstream record, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Story(Story),
    Comment(Comment),
    Job(Story),
    Poll(Story),
    #[serde(rename = "pollopt")]
    PollOption(Story),
    /// Any tag this crate does not model.
    #[serde(other)]
    Other,
}

impl Item {
    /// Only items tagged `story`; list results skip everything else.
    #[must_use]
    pub fn into_story(self) -> Option<Story> {
        match self {
            Self::Story(story) => Some(story),
            _ => None,
        }
    }

    /// Projects any modelled item into a story-shaped record.
    ///
    /// Jobs and polls keep their own fields. A comment keeps its author, time,
    /// text, and kids, with an empty title and zero score.
    #[must_use]
    pub fn into_story_record(self) -> Option<Story> {
        match self {
            Self::Story(story) | Self::Job(story) | Self::Poll(story) | Self::PollOption(story) => {
                Some(story)
            }
            Self::Comment(comment) => Some(Story {
                id: comment.id,
                by: comment.by,
                time: comment.time,
                kids: comment.kids,
                text: comment.text,
                ..Story::default()
            }),
            Self::Other => None,
        }
    }

    #[must_use]
    pub fn into_comment(self) -> Option<Comment> {
        match self {
            Self::Comment(comment) => Some(comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: ItemId,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub kids: Option<Vec<ItemId>>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: ItemId,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub kids: Option<Vec<ItemId>>,
}

/// Story projection used by the list and detail renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedStory {
    pub id: ItemId,
    pub title: String,
    pub by: String,
    pub time: String,
    pub url: Option<String>,
    pub score: i64,
    /// Direct children only.
    pub comments_count: usize,
}

/// Comment projection with cleaned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedComment {
    pub id: ItemId,
    pub by: String,
    pub time: String,
    pub text: String,
    /// Direct replies only.
    pub replies: usize,
}
