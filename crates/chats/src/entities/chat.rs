use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::channel::Channel;
use crate::types::{ChannelId, ChatError, ChatId, UserId};

/// Represents a conversation container in the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    pub id: ChatId,
    pub chat_type: ChatType,
    /// Stored name. Empty for private chats, where the display name is the
    /// counterpart's id.
    pub name: String,
    /// Unique member ids, in the order they were added.
    pub member_ids: Vec<UserId>,
    /// Channel ids in creation order.
    pub channel_ids: Vec<ChannelId>,
}

/// Chat type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
        }
    }
}

impl FromStr for ChatType {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(ChatType::Private),
            "group" => Ok(ChatType::Group),
            _ => Err(ChatError::InvalidChatType),
        }
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to persist a new chat. Members are already deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateChatRequest {
    pub id: ChatId,
    pub chat_type: ChatType,
    pub name: String,
    pub member_ids: Vec<UserId>,
}

impl CreateChatRequest {
    pub fn new(chat_type: ChatType, name: impl Into<String>, member_ids: Vec<UserId>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_type,
            name: name.into(),
            member_ids,
        }
    }

    pub fn into_chat(self) -> Chat {
        Chat {
            id: self.id,
            chat_type: self.chat_type,
            name: self.name,
            member_ids: self.member_ids,
            channel_ids: Vec::new(),
        }
    }
}

/// Entry of a user's chat list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatPreview {
    pub id: ChatId,
    pub name: String,
}

/// Full view of a chat as returned to one of its members
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatInfo {
    pub id: ChatId,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    pub name: String,
    pub member_ids: Vec<UserId>,
    pub channels: Vec<Channel>,
}

impl Chat {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|member| member == user_id)
    }

    /// The other participant of a private chat, as seen by `user_id`.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        self.member_ids
            .iter()
            .map(String::as_str)
            .find(|member| *member != user_id)
    }

    /// Name shown to `viewer`: the counterpart's id for private chats.
    pub fn display_name(&self, viewer: &str) -> String {
        match self.chat_type {
            ChatType::Private => self.counterpart(viewer).unwrap_or_default().to_string(),
            ChatType::Group => self.name.clone(),
        }
    }

    pub fn preview_for(&self, viewer: &str) -> ChatPreview {
        ChatPreview {
            id: self.id.clone(),
            name: self.display_name(viewer),
        }
    }
}

/// Canonical key for a member set, independent of order and duplicates.
pub fn member_key(member_ids: &[UserId]) -> String {
    let mut sorted: Vec<&str> = member_ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join("\u{1f}")
}
