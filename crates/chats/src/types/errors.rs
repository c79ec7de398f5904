//! Error types for the chat system.

use thiserror::Error;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    InvalidArgument,
    AlreadyExists,
    Internal,
}

/// Main error type for the chat system
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("channel not found")]
    ChannelNotFound,

    #[error("chat not found")]
    ChatNotFound,

    #[error("user is not in this chat")]
    AccessDenied,

    #[error("invalid chat type")]
    InvalidChatType,

    #[error("invalid channel type")]
    InvalidChannelType,

    #[error("private chat requires exactly one other user")]
    InvalidUserCount,

    #[error("cannot create a private chat with yourself")]
    SameUser,

    #[error("group chat name is empty")]
    EmptyGroupName,

    #[error("channel name is empty")]
    EmptyChannelName,

    #[error("invalid message length")]
    InvalidMessage,

    #[error("invalid pagination parameters")]
    InvalidPage,

    #[error("chat already exists")]
    ChatExists,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ChatError {
    /// Create a storage error from any displayable cause
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        Self::Storage(cause.to_string())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::ChannelNotFound | ChatError::ChatNotFound => ErrorKind::NotFound,
            ChatError::AccessDenied => ErrorKind::AccessDenied,
            ChatError::InvalidChatType
            | ChatError::InvalidChannelType
            | ChatError::InvalidUserCount
            | ChatError::SameUser
            | ChatError::EmptyGroupName
            | ChatError::EmptyChannelName
            | ChatError::InvalidMessage
            | ChatError::InvalidPage => ErrorKind::InvalidArgument,
            ChatError::ChatExists => ErrorKind::AlreadyExists,
            ChatError::Storage(_) | ChatError::Internal { .. } => ErrorKind::Internal,
        }
    }
}
