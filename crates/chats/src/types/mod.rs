//! Shared types and interfaces for the chat system.
//!
//! This module contains the error taxonomy, stream events and the id
//! aliases used across the crate.

pub mod errors;
pub mod events;

pub use errors::{ChatError, ChatResult, ErrorKind};
pub use events::ChannelEvent;

// Common type aliases
pub type ChatId = String;
pub type ChannelId = String;
pub type MessageId = String;
pub type UserId = String;
