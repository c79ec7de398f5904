//! REST API endpoints for the gateway

pub mod channel;
pub mod chat;
pub mod health;
pub mod message;

use axum::Router;
use std::sync::Arc;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

/// Create all authenticated REST API routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(chat::create_chat_routes())
        .merge(channel::create_channel_routes())
        .merge(message::create_message_routes())
}

/// Reject an empty or blank id before it reaches a service.
pub(crate) fn require_id(field: &str, value: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::invalid(format!("{field} is required")));
    }
    Ok(())
}

/// Reject a missing field.
pub(crate) fn require<T>(field: &str, value: Option<T>) -> GatewayResult<T> {
    value.ok_or_else(|| GatewayError::invalid(format!("{field} is required")))
}
