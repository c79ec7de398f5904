use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::types::{ChannelId, ChatError, ChatId, MessageId};

/// Name of the channel created alongside every chat.
pub const DEFAULT_CHANNEL_NAME: &str = "Main";

/// A named sub-stream of a chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    pub id: ChannelId,
    pub chat_id: ChatId,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Message ids in persistence order.
    pub message_ids: Vec<MessageId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Text,
    Voice,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Text => "text",
            ChannelType::Voice => "voice",
        }
    }
}

impl FromStr for ChannelType {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ChannelType::Text),
            "voice" => Ok(ChannelType::Voice),
            _ => Err(ChatError::InvalidChannelType),
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to persist a new channel under an existing chat
#[derive(Debug, Clone, PartialEq)]
pub struct CreateChannelRequest {
    pub id: ChannelId,
    pub chat_id: ChatId,
    pub name: String,
    pub channel_type: ChannelType,
}

impl CreateChannelRequest {
    pub fn new(chat_id: impl Into<ChatId>, name: impl Into<String>, channel_type: ChannelType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            name: name.into(),
            channel_type,
        }
    }

    /// The "Main" text channel every new chat starts with.
    pub fn default_for(chat_id: impl Into<ChatId>) -> Self {
        Self::new(chat_id, DEFAULT_CHANNEL_NAME, ChannelType::Text)
    }

    pub fn into_channel(self) -> Channel {
        Channel {
            id: self.id,
            chat_id: self.chat_id,
            name: self.name,
            channel_type: self.channel_type,
            message_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_type_parsing() {
        assert_eq!("text".parse::<ChannelType>().unwrap(), ChannelType::Text);
        assert_eq!("voice".parse::<ChannelType>().unwrap(), ChannelType::Voice);
        assert!(matches!(
            "video".parse::<ChannelType>(),
            Err(ChatError::InvalidChannelType)
        ));
    }

    #[test]
    fn test_default_channel() {
        let channel = CreateChannelRequest::default_for("chat-1").into_channel();
        assert_eq!(channel.name, "Main");
        assert_eq!(channel.channel_type, ChannelType::Text);
        assert_eq!(channel.chat_id, "chat-1");
        assert!(channel.message_ids.is_empty());
    }
}
