use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, MessageId, UserId};

/// A persisted, immutable chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub text: String,
    pub sender_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Request to append a message to a channel
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMessageRequest {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub sender_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CreateMessageRequest {
    pub fn new(
        channel_id: impl Into<ChannelId>,
        sender_id: impl Into<UserId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: cuid2::create_id(),
            channel_id: channel_id.into(),
            sender_id: sender_id.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn into_message(self) -> Message {
        Message {
            id: self.id,
            channel_id: self.channel_id,
            text: self.text,
            sender_id: self.sender_id,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let first = CreateMessageRequest::new("c", "u", "one");
        let second = CreateMessageRequest::new("c", "u", "two");
        assert_ne!(first.id, second.id);

        let message = first.into_message();
        assert_eq!(message.text, "one");
        assert_eq!(message.sender_id, "u");
    }
}
