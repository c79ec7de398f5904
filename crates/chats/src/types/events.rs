//! Events pushed to live channel subscribers.

use serde::{Deserialize, Serialize};

use crate::entities::Message;

/// One item on a channel stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ChannelEvent {
    NewMessage(Message),
    ErrorMessage { message: String },
}

impl ChannelEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::ErrorMessage {
            message: message.into(),
        }
    }

    /// Channel the event belongs to, if it carries one.
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            ChannelEvent::NewMessage(message) => Some(&message.channel_id),
            ChannelEvent::ErrorMessage { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_new_message_wire_shape() {
        let message = Message {
            id: "m1".to_string(),
            channel_id: "general".to_string(),
            text: "hi".to_string(),
            sender_id: "bob".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(ChannelEvent::NewMessage(message)).unwrap();
        assert_eq!(value["type"], "new_message");
        assert_eq!(value["data"]["channel_id"], "general");
        assert_eq!(value["data"]["sender_id"], "bob");
    }

    #[test]
    fn test_error_message_wire_shape() {
        let value = serde_json::to_value(ChannelEvent::error("internal error")).unwrap();
        assert_eq!(value["type"], "error_message");
        assert_eq!(value["data"]["message"], "internal error");
    }
}
