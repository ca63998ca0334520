//! Per-origin status messages of the job being processed.
//! 当前任务在每个来源频道上的状态消息。

use rb_core::ports::{MessengerPort, OutgoingMessage};
use rb_core::{ChannelId, MessageId, OriginRef, SubjectId};
use tracing::warn;

use super::super::messages;

struct StatusLine {
    channel_id: ChannelId,
    base: String,
    /// `None` when the initial send failed
    message_id: Option<MessageId>,
}

/// Status messages keyed by channel, in origin arrival order.
pub(super) struct StatusBoard {
    subject_id: SubjectId,
    lines: Vec<StatusLine>,
}

impl StatusBoard {
    pub(super) fn new(subject_id: SubjectId) -> Self {
        Self {
            subject_id,
            lines: Vec::new(),
        }
    }

    /// Send the "processing" line to every origin that has none yet.
    pub(super) async fn announce(&mut self, messenger: &dyn MessengerPort, origins: &[OriginRef]) {
        for origin in origins {
            if self.lines.iter().any(|l| l.channel_id == origin.channel_id) {
                continue;
            }
            let base = messages::processing(&origin.requester_id, &self.subject_id);
            let message_id = match messenger
                .send(&origin.channel_id, OutgoingMessage::Text(base.clone()))
                .await
            {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(channel_id = %origin.channel_id, error = %err, "Failed to send status message");
                    None
                }
            };
            self.lines.push(StatusLine {
                channel_id: origin.channel_id.clone(),
                base,
                message_id,
            });
        }
    }

    pub(super) async fn progress(&self, messenger: &dyn MessengerPort, percent: u8) {
        for line in &self.lines {
            let text = messages::progress(&line.base, percent);
            Self::edit(messenger, line, text).await;
        }
    }

    /// Replace every status line with `text`.
    pub(super) async fn finish(&self, messenger: &dyn MessengerPort, text: &str) {
        for line in &self.lines {
            Self::edit(messenger, line, text.to_string()).await;
        }
    }

    async fn edit(messenger: &dyn MessengerPort, line: &StatusLine, text: String) {
        let result = match &line.message_id {
            Some(message_id) => messenger
                .edit(&line.channel_id, message_id, OutgoingMessage::Text(text))
                .await,
            None => messenger
                .send(&line.channel_id, OutgoingMessage::Text(text))
                .await
                .map(|_| ()),
        };
        if let Err(err) = result {
            warn!(channel_id = %line.channel_id, error = %err, "Failed to update status message");
        }
    }
}
