//! Identifiers handed out by the chat platform.
//! 聊天平台分配的标识符。

use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Channel a request arrived in and where replies are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

/// User who issued a request or pressed a navigation button.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(String);

/// Identifier of a delivered message. Doubles as the result cache handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl_id!(ChannelId, UserId, GuildId, MessageId);

impl MessageId {
    /// Generate a fresh random id, for messengers that do not get one from a server.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
