//! Use case for paging through a delivered result
//! 翻页查看已发送结果的用例

use std::sync::Arc;

use rb_core::ports::{MessengerError, MessengerPort, OutgoingMessage, ResultCachePort};
use rb_core::{ChannelId, MessageId, NavAction, NavigationError, RenderedPage, UserId};
use tracing::{info, info_span, Instrument};

use crate::deps::AppDeps;

#[derive(Debug, thiserror::Error)]
pub enum NavigateResultError {
    /// The cache refused the move; the message is left as it was.
    #[error(transparent)]
    Rejected(#[from] NavigationError),

    /// The page changed but the message could not be edited.
    #[error("failed to show the new page: {0}")]
    Delivery(#[from] MessengerError),
}

/// Moves a cached result one page and edits its message.
pub struct NavigateResult {
    result_cache: Arc<dyn ResultCachePort>,
    messenger: Arc<dyn MessengerPort>,
}

impl NavigateResult {
    pub fn new(deps: &AppDeps) -> Self {
        Self {
            result_cache: deps.result_cache.clone(),
            messenger: deps.messenger.clone(),
        }
    }

    pub async fn execute(
        &self,
        handle: &MessageId,
        channel_id: &ChannelId,
        actor: &UserId,
        action: NavAction,
    ) -> Result<RenderedPage, NavigateResultError> {
        let span = info_span!(
            "usecase.navigate_result.execute",
            handle = %handle,
            actor = %actor,
            action = ?action
        );

        async {
            let page = self
                .result_cache
                .navigate(handle, action.delta(), actor)
                .await
                .inspect_err(|err| info!(error = %err, "Navigation rejected"))?;

            self.messenger
                .edit(channel_id, handle, OutgoingMessage::Page(page.clone()))
                .await?;

            info!(page = page.page, "Result page changed");
            Ok(page)
        }
        .instrument(span)
        .await
    }
}
