use thiserror::Error;

use crate::ids::{ChannelId, MessageId};
use crate::render::RenderedPage;

/// Payload of a message sent to or edited on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    Text(String),
    /// A rendered result page, passed to the platform verbatim
    Page(RenderedPage),
}

#[derive(Debug, Error)]
pub enum MessengerError {
    #[error("channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("message not found: {0}")]
    MessageNotFound(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Chat platform collaborator.
///
/// 聊天平台：发送与编辑消息。
#[async_trait::async_trait]
pub trait MessengerPort: Send + Sync {
    /// Send a new message; the returned id is what result cache handles are made of.
    async fn send(
        &self,
        channel_id: &ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, MessengerError>;

    async fn edit(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        message: OutgoingMessage,
    ) -> Result<(), MessengerError>;
}
