//! WebSocket endpoints for the gateway

pub mod stream;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::GatewayState;

/// Create all WebSocket routes
pub fn create_websocket_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/ws/channels/:channel_id", get(stream::chat_stream_handler))
}

pub use stream::*;
