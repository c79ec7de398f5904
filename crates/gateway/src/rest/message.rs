//! Message REST endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use courier_chats::Message;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::require_id;
use crate::error::{GatewayError, GatewayResult};
use crate::middleware::AuthenticatedUser;
use crate::state::GatewayState;

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message_id: String,
}

/// Missing values deserialize as zero and are rejected.
#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// Create message routes
pub fn create_message_routes() -> Router<Arc<GatewayState>> {
    Router::new().route(
        "/api/channels/:channel_id/messages",
        get(list_messages).post(send_message),
    )
}

pub async fn send_message(
    State(state): State<Arc<GatewayState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(channel_id): Path<String>,
    Json(payload): Json<SendMessageBody>,
) -> GatewayResult<impl IntoResponse> {
    require_id("channel_id", &channel_id)?;
    if payload.text.is_empty() {
        return Err(GatewayError::invalid("text is required"));
    }

    let message = state
        .services
        .messages
        .send_message(&user_id, &channel_id, &payload.text)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message_id: message.id,
        }),
    ))
}

pub async fn list_messages(
    State(state): State<Arc<GatewayState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(channel_id): Path<String>,
    Query(params): Query<ListMessagesQuery>,
) -> GatewayResult<Json<MessagesResponse>> {
    require_id("channel_id", &channel_id)?;
    if params.limit == 0 || params.offset == 0 {
        return Err(GatewayError::invalid("limit and offset must be positive"));
    }

    let messages = state
        .services
        .messages
        .get_messages(&user_id, &channel_id, params.limit, params.offset)
        .await?;

    Ok(Json(MessagesResponse { messages }))
}
