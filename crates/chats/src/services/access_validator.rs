//! Channel → chat → membership authorization.

use std::sync::Arc;

use crate::entities::Channel;
use crate::repositories::{ChannelProvider, ChatProvider};
use crate::types::{ChatError, ChatResult};
use crate::utils::PermissionChecker;

/// Gate for every channel-scoped operation.
#[derive(Clone)]
pub struct AccessValidator {
    chats: Arc<dyn ChatProvider>,
    channels: Arc<dyn ChannelProvider>,
}

impl AccessValidator {
    pub fn new(chats: Arc<dyn ChatProvider>, channels: Arc<dyn ChannelProvider>) -> Self {
        Self { chats, channels }
    }

    /// Resolve `channel_id` and check that `user_id` belongs to its chat.
    /// Returns the channel, without its message ids, on success. Performs
    /// no writes.
    pub async fn validate(&self, channel_id: &str, user_id: &str) -> ChatResult<Channel> {
        let channel = self
            .channels
            .find_channel_summary(channel_id)
            .await?
            .ok_or(ChatError::ChannelNotFound)?;

        let chat = self
            .chats
            .find_chat_by_id(&channel.chat_id)
            .await?
            .ok_or(ChatError::ChatNotFound)?;

        PermissionChecker::can_access_chat(&chat, user_id)?;
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ChannelType, ChatType, CreateChannelRequest, CreateChatRequest};
    use crate::repositories::{MockChannelProvider, MockChatProvider};

    fn channel(chat_id: &str) -> Channel {
        let mut channel = CreateChannelRequest::new(chat_id, "general", ChannelType::Text).into_channel();
        channel.id = "chan-1".to_string();
        channel
    }

    fn chat(members: &[&str]) -> crate::entities::Chat {
        let mut chat = CreateChatRequest::new(
            ChatType::Group,
            "Team",
            members.iter().map(|m| m.to_string()).collect(),
        )
        .into_chat();
        chat.id = "chat-1".to_string();
        chat
    }

    fn validator(chats: MockChatProvider, channels: MockChannelProvider) -> AccessValidator {
        AccessValidator::new(Arc::new(chats), Arc::new(channels))
    }

    #[tokio::test]
    async fn test_member_is_allowed() {
        let mut channels = MockChannelProvider::new();
        channels
            .expect_find_channel_summary()
            .returning(|_| Ok(Some(channel("chat-1"))));
        let mut chats = MockChatProvider::new();
        chats
            .expect_find_chat_by_id()
            .returning(|id| {
                assert_eq!(id, "chat-1");
                Ok(Some(chat(&["alice", "bob"])))
            });

        let resolved = validator(chats, channels).validate("chan-1", "bob").await.unwrap();
        assert_eq!(resolved.id, "chan-1");
    }

    #[tokio::test]
    async fn test_missing_channel() {
        let mut channels = MockChannelProvider::new();
        channels.expect_find_channel_summary().returning(|_| Ok(None));
        let mut chats = MockChatProvider::new();
        chats.expect_find_chat_by_id().never();

        let result = validator(chats, channels).validate("nope", "bob").await;
        assert!(matches!(result, Err(ChatError::ChannelNotFound)));
    }

    #[tokio::test]
    async fn test_missing_chat() {
        let mut channels = MockChannelProvider::new();
        channels
            .expect_find_channel_summary()
            .returning(|_| Ok(Some(channel("gone"))));
        let mut chats = MockChatProvider::new();
        chats.expect_find_chat_by_id().returning(|_| Ok(None));

        let result = validator(chats, channels).validate("chan-1", "bob").await;
        assert!(matches!(result, Err(ChatError::ChatNotFound)));
    }

    #[tokio::test]
    async fn test_non_member_is_denied() {
        let mut channels = MockChannelProvider::new();
        channels
            .expect_find_channel_summary()
            .returning(|_| Ok(Some(channel("chat-1"))));
        let mut chats = MockChatProvider::new();
        chats
            .expect_find_chat_by_id()
            .returning(|_| Ok(Some(chat(&["alice", "bob"]))));

        let result = validator(chats, channels).validate("chan-1", "mallory").await;
        assert!(matches!(result, Err(ChatError::AccessDenied)));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut channels = MockChannelProvider::new();
        channels
            .expect_find_channel_summary()
            .returning(|_| Err(ChatError::storage("connection reset")));
        let chats = MockChatProvider::new();

        let result = validator(chats, channels).validate("chan-1", "bob").await;
        assert!(matches!(result, Err(ChatError::Storage(_))));
    }
}
