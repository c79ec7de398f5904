//! Domain entities for the chat system.
//!
//! These are plain value types. Persistence lives behind the provider
//! traits in [`crate::repositories`].

pub mod channel;
pub mod chat;
pub mod message;

pub use channel::{Channel, ChannelType, CreateChannelRequest, DEFAULT_CHANNEL_NAME};
pub use chat::{member_key, Chat, ChatInfo, ChatPreview, ChatType, CreateChatRequest};
pub use message::{CreateMessageRequest, Message};
