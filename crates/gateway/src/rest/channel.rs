//! Channel REST endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{require, require_id};
use crate::error::{GatewayError, GatewayResult};
use crate::middleware::AuthenticatedUser;
use crate::state::GatewayState;

#[derive(Debug, Deserialize)]
pub struct CreateChannelBody {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateChannelResponse {
    pub channel_id: String,
}

/// Create channel routes
pub fn create_channel_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/api/chats/:chat_id/channels", post(create_channel))
}

pub async fn create_channel(
    State(state): State<Arc<GatewayState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(chat_id): Path<String>,
    Json(payload): Json<CreateChannelBody>,
) -> GatewayResult<impl IntoResponse> {
    require_id("chat_id", &chat_id)?;
    let channel_type = require("type", payload.channel_type)?;
    if payload.name.trim().is_empty() {
        return Err(GatewayError::invalid("name is required"));
    }

    let channel = state
        .services
        .channels
        .create_channel(&user_id, &chat_id, &payload.name, &channel_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateChannelResponse {
            channel_id: channel.id,
        }),
    ))
}
