//! Chat creation and chat-level reads.

use std::sync::Arc;
use tracing::{error, info};

use crate::entities::{ChatInfo, ChatPreview, ChatType, CreateChannelRequest, CreateChatRequest};
use crate::repositories::{ChannelProvider, ChatProvider};
use crate::types::{ChatError, ChatId, ChatResult, UserId};
use crate::utils::{PermissionChecker, Validator};

#[derive(Clone)]
pub struct ChatService {
    chats: Arc<dyn ChatProvider>,
    channels: Arc<dyn ChannelProvider>,
}

impl ChatService {
    pub fn new(chats: Arc<dyn ChatProvider>, channels: Arc<dyn ChannelProvider>) -> Self {
        Self { chats, channels }
    }

    /// Create a chat owned by `creator_id` together with its "Main" text channel.
    ///
    /// The chat and the channel are two separate writes. If the second one
    /// fails the chat is left without channels and the error is returned.
    pub async fn create_chat(
        &self,
        creator_id: &str,
        chat_type: &str,
        name: &str,
        other_user_ids: &[UserId],
    ) -> ChatResult<ChatId> {
        let chat_type: ChatType = chat_type.parse()?;
        Validator::chat_members(chat_type, creator_id, name, other_user_ids)?;

        let member_ids = Validator::member_set(creator_id, other_user_ids);

        if chat_type == ChatType::Private
            && self.chats.find_chat(chat_type, &member_ids).await?.is_some()
        {
            return Err(ChatError::ChatExists);
        }

        let stored_name = match chat_type {
            ChatType::Private => String::new(),
            ChatType::Group => name.trim().to_string(),
        };

        let chat = self
            .chats
            .save_chat(CreateChatRequest::new(chat_type, stored_name, member_ids))
            .await?;

        if let Err(err) = self
            .channels
            .save_channel(CreateChannelRequest::default_for(&chat.id))
            .await
        {
            error!(chat_id = %chat.id, error = %err, "chat created without its default channel");
            return Err(err);
        }

        info!(chat_id = %chat.id, chat_type = %chat_type, creator_id, "created new chat");
        Ok(chat.id)
    }

    /// Chats of `chat_type` that `user_id` belongs to.
    pub async fn get_user_chats(&self, user_id: &str, chat_type: &str) -> ChatResult<Vec<ChatPreview>> {
        let chat_type: ChatType = chat_type.parse()?;
        let chats = self.chats.find_user_chats(user_id, chat_type).await?;

        Ok(chats.iter().map(|chat| chat.preview_for(user_id)).collect())
    }

    pub async fn get_chat_info(&self, user_id: &str, chat_id: &str) -> ChatResult<ChatInfo> {
        let chat = self
            .chats
            .find_chat_by_id(chat_id)
            .await?
            .ok_or(ChatError::ChatNotFound)?;

        PermissionChecker::can_access_chat(&chat, user_id)?;

        let channels = self.channels.find_channels_by_ids(&chat.channel_ids).await?;

        Ok(ChatInfo {
            name: chat.display_name(user_id),
            id: chat.id,
            chat_type: chat.chat_type,
            member_ids: chat.member_ids,
            channels,
        })
    }
}
