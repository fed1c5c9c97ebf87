use tracing::{debug, info};

use crate::fetch::fetch_comments;
use crate::format::{render_comment_list, to_formatted_comment};
use crate::models::{FormattedComment, ItemId};
use crate::session::StorySession;

use super::{CommentTarget, DispatchError, HnControlPlane};

impl HnControlPlane {
    /// Fetches and renders the direct comments of a story.
    ///
    /// # Errors
    /// Returns `DispatchError` if the index cannot be resolved against the
    /// session or the story cannot be fetched.
    pub async fn get_comments(
        &self,
        target: CommentTarget,
        session: &StorySession,
    ) -> Result<String, DispatchError> {
        let story_id = resolve_target(target, session).await?;
        let story = self.fetch_story(story_id).await?;

        let kids = story.kids.as_deref().unwrap_or_default();
        if kids.is_empty() {
            debug!(story_id, "story has no comments");
            return Ok(format!(
                "No comments found for story \"{}\" (ID: {story_id})",
                story.title
            ));
        }

        let batch = fetch_comments(&self.client, kids, self.options).await;
        let comments: Vec<FormattedComment> =
            batch.items.iter().map(to_formatted_comment).collect();
        info!(
            story_id,
            requested = kids.len(),
            returned = comments.len(),
            "fetched comments"
        );
        Ok(render_comment_list(&story.title, &comments))
    }
}

async fn resolve_target(
    target: CommentTarget,
    session: &StorySession,
) -> Result<ItemId, DispatchError> {
    match target {
        CommentTarget::Id(id) => Ok(id),
        CommentTarget::Index(index) => {
            if let Some(story) = session.story_at(index).await {
                return Ok(story.id);
            }
            let available = session.len().await;
            if available == 0 {
                Err(DispatchError::NoSession)
            } else {
                Err(DispatchError::InvalidIndex { index, available })
            }
        }
    }
}
