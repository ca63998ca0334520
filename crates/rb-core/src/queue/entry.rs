use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, GuildId, SubjectId, UserId};

/// Who is waiting on a subject: the (channel, requester, guild) a request came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginRef {
    pub channel_id: ChannelId,
    pub requester_id: UserId,
    /// `None` for direct messages
    pub guild_id: Option<GuildId>,
}

impl OriginRef {
    pub fn new(channel_id: ChannelId, requester_id: UserId, guild_id: Option<GuildId>) -> Self {
        Self {
            channel_id,
            requester_id,
            guild_id,
        }
    }
}

/// One pending or running computation and everyone waiting on it.
///
/// `origins` is never empty and is ordered by arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub subject_id: SubjectId,
    pub origins: Vec<OriginRef>,
}

impl QueueEntry {
    pub fn new(subject_id: SubjectId, first_origin: OriginRef) -> Self {
        Self {
            subject_id,
            origins: vec![first_origin],
        }
    }

    pub fn has_channel(&self, channel_id: &ChannelId) -> bool {
        self.origins
            .iter()
            .any(|origin| &origin.channel_id == channel_id)
    }
}
