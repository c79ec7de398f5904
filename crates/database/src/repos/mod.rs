//! SQLite implementations of the chat provider traits.

pub mod channel_repository;
pub mod chat_repository;
pub mod message_repository;

pub use channel_repository::ChannelRepository;
pub use chat_repository::ChatRepository;
pub use message_repository::MessageRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use courier_chats::ChatError;

use crate::types::DatabaseError;

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ChatError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| DatabaseError::DecodeError(format!("bad timestamp {value}: {e}")).into())
}

pub(crate) fn decode_error(what: &str, value: &str) -> ChatError {
    DatabaseError::DecodeError(format!("unknown {what} {value}")).into()
}
