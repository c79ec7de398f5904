//! # Courier Chats Crate
//!
//! Core business logic for Courier: chats, their channels, the messages in
//! those channels and the live per-channel event feed.
//!
//! ## Architecture
//!
//! - **Entities**: Domain values (Chat, Channel, Message)
//! - **Repositories**: Narrow provider traits plus an in-memory store
//! - **Services**: Access validation, chat/channel management, messaging and
//!   the subscription registry that fans events out to streams
//! - **Types**: Errors, events and id aliases
//! - **Utils**: Input validation and membership checks
//!
//! ## Usage
//!
//! ```rust
//! use courier_chats::{ChatServices, MemoryStore, ServiceLimits};
//!
//! # tokio_test::block_on(async {
//! let services = ChatServices::from_store(MemoryStore::new(), ServiceLimits::default());
//! let chat_id = services
//!     .chats
//!     .create_chat("alice", "group", "Team", &["bob".to_string()])
//!     .await?;
//! let info = services.chats.get_chat_info("bob", &chat_id).await?;
//! let message = services
//!     .messages
//!     .send_message("bob", &info.channels[0].id, "hello")
//!     .await?;
//! assert_eq!(message.text, "hello");
//! # Ok::<(), courier_chats::ChatError>(())
//! # }).unwrap();
//! ```

pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use entities::{
    Channel, ChannelType, Chat, ChatInfo, ChatPreview, ChatType, CreateChannelRequest,
    CreateChatRequest, CreateMessageRequest, Message, DEFAULT_CHANNEL_NAME,
};
pub use repositories::{ChannelProvider, ChatProvider, MemoryStore, MessageProvider, Page};
pub use services::{
    AccessValidator, BroadcastReport, ChannelService, ChatService, ChatServices, EventSink,
    MessageService, ServiceLimits, SinkClosed, StreamEnd, Subscription, SubscriptionRegistry,
};
pub use types::{
    ChannelEvent, ChannelId, ChatError, ChatId, ChatResult, ErrorKind, MessageId, UserId,
};
