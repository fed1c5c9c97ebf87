//! Fan-out fetching of item batches.
//!
//! Every batch is driven through a bounded, order-preserving stream. Items that
//! fail, come back `null`, or are of the wrong kind are dropped and counted.
//! When the batch deadline passes, whatever finished in order so far is kept.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::client::{ClientResult, HnClient, StoryCategory};
use crate::models::{Comment, Item, ItemId, Story};

pub const DEFAULT_FETCH_LIMIT: usize = 50;
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fan-out limits applied to every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_concurrency: usize,
    pub batch_timeout: Duration,
}

impl FetchOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            batch_timeout: DEFAULT_BATCH_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[must_use]
    pub const fn with_batch_timeout(mut self, batch_timeout: Duration) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a batch fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    /// Surviving items in id-list order.
    pub items: Vec<T>,
    /// Ids that failed, were absent, or had the wrong type.
    pub dropped: usize,
    /// The id list itself could not be fetched.
    pub list_unavailable: bool,
    /// The batch deadline passed before every fetch settled.
    pub timed_out: bool,
}

impl<T> Batch<T> {
    const fn empty() -> Self {
        Self {
            items: Vec::new(),
            dropped: 0,
            list_unavailable: false,
            timed_out: false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fetches up to `limit` stories from a category list, `DEFAULT_FETCH_LIMIT`
/// when unspecified.
///
/// An unreachable id list yields an empty batch flagged `list_unavailable`.
pub async fn fetch_stories(
    client: &HnClient,
    category: StoryCategory,
    limit: Option<usize>,
    options: FetchOptions,
) -> Batch<Story> {
    let ids = match client.list_ids(category).await {
        Ok(ids) => ids,
        Err(err) => {
            warn!(%category, error = %err, "story id list unavailable");
            return Batch {
                list_unavailable: true,
                ..Batch::empty()
            };
        }
    };
    let limit = limit.unwrap_or(DEFAULT_FETCH_LIMIT);
    let ids: Vec<ItemId> = ids.into_iter().take(limit).collect();
    fetch_batch(client, &ids, options, Item::into_story).await
}

/// Fetches the given comment ids, typically a story's direct kids.
pub async fn fetch_comments(
    client: &HnClient,
    ids: &[ItemId],
    options: FetchOptions,
) -> Batch<Comment> {
    fetch_batch(client, ids, options, Item::into_comment).await
}

async fn fetch_batch<T, F>(
    client: &HnClient,
    ids: &[ItemId],
    options: FetchOptions,
    select: F,
) -> Batch<T>
where
    F: Fn(Item) -> Option<T>,
{
    if ids.is_empty() {
        return Batch::empty();
    }

    let deadline = tokio::time::sleep(options.batch_timeout);
    let results: Vec<(ItemId, ClientResult<Option<Item>>)> = stream::iter(ids.iter().copied())
        .map(|id| async move { (id, client.fetch_item(id).await) })
        .buffered(options.max_concurrency.max(1))
        .take_until(deadline)
        .collect()
        .await;

    let timed_out = results.len() < ids.len();
    if timed_out {
        warn!(
            settled = results.len(),
            requested = ids.len(),
            timeout_ms = u64::try_from(options.batch_timeout.as_millis()).unwrap_or(u64::MAX),
            "item batch deadline passed"
        );
    }

    let mut items = Vec::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(Some(item)) => {
                if let Some(selected) = select(item) {
                    items.push(selected);
                } else {
                    debug!(id, "dropping item of unexpected type");
                }
            }
            Ok(None) => debug!(id, "item not found upstream"),
            Err(err) => warn!(id, error = %err, "item fetch failed"),
        }
    }

    let dropped = ids.len() - items.len();
    debug!(requested = ids.len(), kept = items.len(), dropped, "item batch settled");
    Batch {
        items,
        dropped,
        list_unavailable: false,
        timed_out,
    }
}
