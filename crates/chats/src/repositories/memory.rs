//! In-process providers backed by hash maps.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ChannelProvider, ChatProvider, MessageProvider, Page};
use crate::entities::{
    member_key, Channel, Chat, ChatType, CreateChannelRequest, CreateChatRequest,
    CreateMessageRequest, Message,
};
use crate::types::{ChannelId, ChatError, ChatId, ChatResult, MessageId, UserId};

#[derive(Default)]
struct Inner {
    chats: HashMap<ChatId, Chat>,
    /// Insertion order of chats, for stable listings.
    chat_order: Vec<ChatId>,
    channels: HashMap<ChannelId, Channel>,
    messages: HashMap<MessageId, Message>,
}

/// Memory-backed implementation of every provider trait.
///
/// All three providers share one lock so that appending a child id to its
/// parent happens in the same critical section as the insert.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn chat_count(&self) -> usize {
        self.inner.read().await.chats.len()
    }

    pub async fn message_count(&self) -> usize {
        self.inner.read().await.messages.len()
    }
}

#[async_trait]
impl ChatProvider for MemoryStore {
    async fn save_chat(&self, chat: CreateChatRequest) -> ChatResult<Chat> {
        let mut inner = self.inner.write().await;
        if inner.chats.contains_key(&chat.id) {
            return Err(ChatError::internal(format!("duplicate chat id {}", chat.id)));
        }

        let chat = chat.into_chat();
        inner.chat_order.push(chat.id.clone());
        inner.chats.insert(chat.id.clone(), chat.clone());
        Ok(chat)
    }

    async fn find_chat(
        &self,
        chat_type: ChatType,
        member_ids: &[UserId],
    ) -> ChatResult<Option<Chat>> {
        let key = member_key(member_ids);
        let inner = self.inner.read().await;
        Ok(inner
            .chat_order
            .iter()
            .filter_map(|id| inner.chats.get(id))
            .find(|chat| chat.chat_type == chat_type && member_key(&chat.member_ids) == key)
            .cloned())
    }

    async fn find_chat_by_id(&self, chat_id: &str) -> ChatResult<Option<Chat>> {
        Ok(self.inner.read().await.chats.get(chat_id).cloned())
    }

    async fn find_user_chats(&self, user_id: &str, chat_type: ChatType) -> ChatResult<Vec<Chat>> {
        let inner = self.inner.read().await;
        Ok(inner
            .chat_order
            .iter()
            .filter_map(|id| inner.chats.get(id))
            .filter(|chat| chat.chat_type == chat_type && chat.is_member(user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChannelProvider for MemoryStore {
    async fn save_channel(&self, channel: CreateChannelRequest) -> ChatResult<Channel> {
        let mut inner = self.inner.write().await;
        let channel = channel.into_channel();

        let chat = inner
            .chats
            .get_mut(&channel.chat_id)
            .ok_or(ChatError::ChatNotFound)?;
        chat.channel_ids.push(channel.id.clone());

        inner.channels.insert(channel.id.clone(), channel.clone());
        Ok(channel)
    }

    async fn find_channel_by_id(&self, channel_id: &str) -> ChatResult<Option<Channel>> {
        Ok(self.inner.read().await.channels.get(channel_id).cloned())
    }

    async fn find_channel_summary(&self, channel_id: &str) -> ChatResult<Option<Channel>> {
        Ok(self.inner.read().await.channels.get(channel_id).map(|channel| Channel {
            id: channel.id.clone(),
            chat_id: channel.chat_id.clone(),
            name: channel.name.clone(),
            channel_type: channel.channel_type,
            message_ids: Vec::new(),
        }))
    }

    async fn find_channels_by_ids(&self, channel_ids: &[ChannelId]) -> ChatResult<Vec<Channel>> {
        let inner = self.inner.read().await;
        Ok(channel_ids
            .iter()
            .filter_map(|id| inner.channels.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MessageProvider for MemoryStore {
    async fn save_message(&self, message: CreateMessageRequest) -> ChatResult<Message> {
        let mut inner = self.inner.write().await;
        let message = message.into_message();

        let channel = inner
            .channels
            .get_mut(&message.channel_id)
            .ok_or(ChatError::ChannelNotFound)?;
        channel.message_ids.push(message.id.clone());

        inner.messages.insert(message.id.clone(), message.clone());
        Ok(message)
    }

    async fn get_messages(&self, channel_id: &str, page: Page) -> ChatResult<Vec<Message>> {
        let inner = self.inner.read().await;
        let channel = inner
            .channels
            .get(channel_id)
            .ok_or(ChatError::ChannelNotFound)?;

        // Newest persisted first; the stable sort keeps that order for equal timestamps.
        let mut history: Vec<&Message> = channel
            .message_ids
            .iter()
            .rev()
            .filter_map(|id| inner.messages.get(id))
            .collect();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(history
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ChannelType;

    fn users(ids: &[&str]) -> Vec<UserId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    async fn store_with_channel() -> (MemoryStore, Chat, Channel) {
        let store = MemoryStore::new();
        let chat = store
            .save_chat(CreateChatRequest::new(
                ChatType::Group,
                "Team",
                users(&["a", "b"]),
            ))
            .await
            .unwrap();
        let channel = store
            .save_channel(CreateChannelRequest::new(&chat.id, "general", ChannelType::Text))
            .await
            .unwrap();
        (store, chat, channel)
    }

    #[tokio::test]
    async fn test_save_channel_appends_to_chat() {
        let (store, chat, channel) = store_with_channel().await;

        let stored = store.find_chat_by_id(&chat.id).await.unwrap().unwrap();
        assert_eq!(stored.channel_ids, vec![channel.id.clone()]);

        let orphan = store
            .save_channel(CreateChannelRequest::new("missing", "x", ChannelType::Voice))
            .await;
        assert!(matches!(orphan, Err(ChatError::ChatNotFound)));
    }

    #[tokio::test]
    async fn test_find_chat_matches_member_set() {
        let store = MemoryStore::new();
        store
            .save_chat(CreateChatRequest::new(
                ChatType::Private,
                "",
                users(&["b", "a"]),
            ))
            .await
            .unwrap();

        let found = store
            .find_chat(ChatType::Private, &users(&["a", "b"]))
            .await
            .unwrap();
        assert!(found.is_some());

        let group = store
            .find_chat(ChatType::Group, &users(&["a", "b"]))
            .await
            .unwrap();
        assert!(group.is_none());

        let other = store
            .find_chat(ChatType::Private, &users(&["a", "c"]))
            .await
            .unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_messages_are_paged_newest_first() {
        let (store, _chat, channel) = store_with_channel().await;

        for text in ["one", "two", "three", "four"] {
            store
                .save_message(CreateMessageRequest::new(&channel.id, "a", text))
                .await
                .unwrap();
        }

        let first = store
            .get_messages(&channel.id, Page::new(2, 1).unwrap())
            .await
            .unwrap();
        let texts: Vec<_> = first.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["four", "three"]);

        let shifted = store
            .get_messages(&channel.id, Page::new(2, 3).unwrap())
            .await
            .unwrap();
        let texts: Vec<_> = shifted.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "one"]);

        let stored = store.find_channel_by_id(&channel.id).await.unwrap().unwrap();
        assert_eq!(stored.message_ids.len(), 4);
    }

    #[tokio::test]
    async fn test_channel_summary_has_no_message_ids() {
        let (store, chat, channel) = store_with_channel().await;
        store
            .save_message(CreateMessageRequest::new(&channel.id, "a", "hello"))
            .await
            .unwrap();

        let summary = store.find_channel_summary(&channel.id).await.unwrap().unwrap();
        assert_eq!(summary.chat_id, chat.id);
        assert!(summary.message_ids.is_empty());
        assert!(store.find_channel_summary("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_user_chats_filters_type_and_membership() {
        let store = MemoryStore::new();
        store
            .save_chat(CreateChatRequest::new(ChatType::Group, "Team", users(&["a", "b"])))
            .await
            .unwrap();
        store
            .save_chat(CreateChatRequest::new(ChatType::Private, "", users(&["a", "c"])))
            .await
            .unwrap();

        assert_eq!(store.find_user_chats("a", ChatType::Group).await.unwrap().len(), 1);
        assert_eq!(store.find_user_chats("a", ChatType::Private).await.unwrap().len(), 1);
        assert!(store.find_user_chats("b", ChatType::Private).await.unwrap().is_empty());
    }
}
