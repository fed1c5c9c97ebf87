use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::FormattedStory;

/// The most recently listed stories, for positional lookups in later calls.
///
/// Clones share the same slot. Every list call replaces the whole slot, so two
/// list calls racing each other leave whichever finished last; nothing orders
/// them beyond that.
#[derive(Debug, Clone, Default)]
pub struct StorySession {
    stories: Arc<RwLock<Vec<FormattedStory>>>,
}

impl StorySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, stories: Vec<FormattedStory>) {
        *self.stories.write().await = stories;
    }

    /// Returns the story at a 1-based position.
    pub async fn story_at(&self, index: usize) -> Option<FormattedStory> {
        let stories = self.stories.read().await;
        index
            .checked_sub(1)
            .and_then(|position| stories.get(position))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.stories.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.stories.read().await.is_empty()
    }
}
