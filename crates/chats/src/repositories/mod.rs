//! Storage collaborators for the chat system.
//!
//! The services only see these three narrow traits. [`MemoryStore`] is the
//! in-process implementation; the SQLite one lives in `courier-database`.

pub mod memory;

use async_trait::async_trait;

use crate::entities::{
    Channel, Chat, ChatType, CreateChannelRequest, CreateChatRequest, CreateMessageRequest,
    Message,
};
use crate::types::{ChannelId, ChatError, ChatResult, UserId};

pub use memory::MemoryStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn save_chat(&self, chat: CreateChatRequest) -> ChatResult<Chat>;

    /// Find a chat of `chat_type` whose member set equals `member_ids`.
    async fn find_chat(&self, chat_type: ChatType, member_ids: &[UserId])
        -> ChatResult<Option<Chat>>;

    async fn find_chat_by_id(&self, chat_id: &str) -> ChatResult<Option<Chat>>;

    /// Chats of `chat_type` that `user_id` belongs to, oldest first.
    async fn find_user_chats(&self, user_id: &str, chat_type: ChatType) -> ChatResult<Vec<Chat>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// Persist the channel and append its id to the parent chat.
    async fn save_channel(&self, channel: CreateChannelRequest) -> ChatResult<Channel>;

    async fn find_channel_by_id(&self, channel_id: &str) -> ChatResult<Option<Channel>>;

    /// Like [`find_channel_by_id`](Self::find_channel_by_id) but leaves
    /// `message_ids` empty. Used on the access-check path of every call.
    async fn find_channel_summary(&self, channel_id: &str) -> ChatResult<Option<Channel>>;

    /// Channels for `channel_ids`, in the order given. Unknown ids are skipped.
    async fn find_channels_by_ids(&self, channel_ids: &[ChannelId]) -> ChatResult<Vec<Channel>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageProvider: Send + Sync {
    /// Persist the message and append its id to the parent channel.
    async fn save_message(&self, message: CreateMessageRequest) -> ChatResult<Message>;

    /// One page of a channel's history, newest first.
    async fn get_messages(&self, channel_id: &str, page: Page) -> ChatResult<Vec<Message>>;
}

/// Pagination window. `offset` is 1-based: the first page has offset 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> ChatResult<Self> {
        if limit == 0 || offset == 0 {
            return Err(ChatError::InvalidPage);
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of newest messages to skip before the page starts.
    pub fn skip(&self) -> u32 {
        self.offset - 1
    }
}
