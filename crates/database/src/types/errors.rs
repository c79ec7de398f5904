//! Error types for the database layer

use courier_chats::ChatError;
use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Corrupt row: {0}")]
    DecodeError(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::QueryError(error.to_string())
    }
}

/// Anything the store fails with is an internal error to callers.
impl From<DatabaseError> for ChatError {
    fn from(error: DatabaseError) -> Self {
        ChatError::Storage(error.to_string())
    }
}

/// Shorthand for `map_err` on sqlx results inside provider methods.
pub(crate) fn storage(error: sqlx::Error) -> ChatError {
    DatabaseError::from(error).into()
}
