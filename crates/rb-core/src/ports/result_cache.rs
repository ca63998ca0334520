use std::sync::Arc;

use crate::cache::{CacheEntry, NavigationError};
use crate::computation::ComputationResult;
use crate::ids::{ChannelId, MessageId, UserId};
use crate::render::RenderedPage;

/// Handle → delivered result, with per-entry page cursor.
#[async_trait::async_trait]
pub trait ResultCachePort: Send + Sync {
    /// Store a delivered result at page 0. `handle` is the id of the message showing it.
    async fn insert(
        &self,
        handle: MessageId,
        result: Arc<ComputationResult>,
        channel_id: ChannelId,
        requester_id: UserId,
    );

    async fn get(&self, handle: &MessageId) -> Option<CacheEntry>;

    /// Move the cursor by `delta` pages on behalf of `actor` and render the new page.
    ///
    /// Rejections leave the entry unchanged.
    async fn navigate(
        &self,
        handle: &MessageId,
        delta: i64,
        actor: &UserId,
    ) -> Result<RenderedPage, NavigationError>;
}
