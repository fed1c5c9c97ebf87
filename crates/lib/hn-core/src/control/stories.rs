use tracing::{info, warn};

use crate::client::StoryCategory;
use crate::fetch::fetch_stories;
use crate::format::{clean_text, render_story_detail, render_story_list, to_formatted_story};
use crate::models::{FormattedStory, ItemId, Story};
use crate::session::StorySession;

use super::{DispatchError, HnControlPlane};

impl HnControlPlane {
    /// Lists a story category, remembers the result in `session`, and renders it.
    ///
    /// An unreachable upstream renders as an empty list.
    pub async fn list_stories(
        &self,
        category: StoryCategory,
        limit: usize,
        session: &StorySession,
    ) -> String {
        let batch = fetch_stories(&self.client, category, Some(limit), self.options).await;
        if batch.list_unavailable {
            warn!(%category, "story list unavailable, rendering empty result");
        }
        let stories: Vec<FormattedStory> = batch.items.iter().map(to_formatted_story).collect();
        info!(
            %category,
            limit,
            returned = stories.len(),
            dropped = batch.dropped,
            "listed stories"
        );
        let rendered = render_story_list(&stories);
        session.replace(stories).await;
        rendered
    }

    /// Fetches and renders a single story.
    ///
    /// # Errors
    /// Returns `DispatchError::NotFound` if the item is absent, unreachable, or of
    /// an unmodelled type. Jobs, polls, and comments render as story records.
    pub async fn get_story(&self, story_id: ItemId) -> Result<String, DispatchError> {
        let story = self.fetch_story(story_id).await?;
        let content = story.text.as_deref().map(|text| clean_text(Some(text)));
        Ok(render_story_detail(
            &to_formatted_story(&story),
            content.as_deref(),
        ))
    }

    pub(crate) async fn fetch_story(&self, story_id: ItemId) -> Result<Story, DispatchError> {
        match self.client.fetch_item(story_id).await {
            Ok(Some(item)) => item.into_story_record().ok_or_else(|| {
                warn!(story_id, "item has an unmodelled type");
                DispatchError::NotFound(story_id)
            }),
            Ok(None) => Err(DispatchError::NotFound(story_id)),
            Err(err) => {
                warn!(story_id, error = %err, "story fetch failed");
                Err(DispatchError::NotFound(story_id))
            }
        }
    }
}
