//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courier_chats::{ChatError, ErrorKind};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// The cause is logged and never sent to the client.
    #[error("internal error")]
    Internal(String),
}

impl GatewayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GatewayError::InvalidRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GatewayError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::AlreadyExists(_) => StatusCode::CONFLICT,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code carried in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated(_) => "unauthenticated",
            GatewayError::PermissionDenied(_) => "permission_denied",
            GatewayError::InvalidRequest(_) => "invalid_argument",
            GatewayError::NotFound(_) => "not_found",
            GatewayError::AlreadyExists(_) => "already_exists",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let GatewayError::Internal(cause) = &self {
            error!(%cause, "request failed");
        }

        let status = self.status_code();
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<ChatError> for GatewayError {
    fn from(error: ChatError) -> Self {
        let message = error.to_string();
        match error.kind() {
            ErrorKind::NotFound => GatewayError::NotFound(message),
            ErrorKind::AccessDenied => GatewayError::PermissionDenied(message),
            ErrorKind::InvalidArgument => GatewayError::InvalidRequest(message),
            ErrorKind::AlreadyExists => GatewayError::AlreadyExists(message),
            ErrorKind::Internal => GatewayError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_errors_map_to_statuses() {
        let cases = [
            (ChatError::ChannelNotFound, StatusCode::NOT_FOUND, "channel not found"),
            (ChatError::ChatNotFound, StatusCode::NOT_FOUND, "chat not found"),
            (ChatError::AccessDenied, StatusCode::FORBIDDEN, "user is not in this chat"),
            (ChatError::InvalidMessage, StatusCode::BAD_REQUEST, "invalid message length"),
            (ChatError::InvalidChannelType, StatusCode::BAD_REQUEST, "invalid channel type"),
            (ChatError::ChatExists, StatusCode::CONFLICT, "chat already exists"),
        ];

        for (chat_error, status, message) in cases {
            let error = GatewayError::from(chat_error);
            assert_eq!(error.status_code(), status);
            assert_eq!(error.to_string(), message);
        }
    }

    #[test]
    fn test_storage_cause_is_hidden() {
        let error = GatewayError::from(ChatError::storage("database is locked"));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.code(), "internal");
        assert_eq!(error.to_string(), "internal error");
    }
}
