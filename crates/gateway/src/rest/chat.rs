//! Chat REST endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use courier_chats::{ChatInfo, ChatPreview, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{require, require_id};
use crate::error::GatewayResult;
use crate::middleware::AuthenticatedUser;
use crate::state::GatewayState;

#[derive(Debug, Deserialize)]
pub struct CreateChatBody {
    #[serde(rename = "type")]
    pub chat_type: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateChatResponse {
    pub chat_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListChatsQuery {
    #[serde(rename = "type")]
    pub chat_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserChatsResponse {
    pub chats: Vec<ChatPreview>,
}

/// Create chat routes
pub fn create_chat_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/chats", get(list_chats).post(create_chat))
        .route("/api/chats/:chat_id", get(get_chat))
}

pub async fn create_chat(
    State(state): State<Arc<GatewayState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(payload): Json<CreateChatBody>,
) -> GatewayResult<impl IntoResponse> {
    let chat_type = require("type", payload.chat_type)?;
    for id in &payload.user_ids {
        require_id("user_ids", id)?;
    }

    let chat_id = state
        .services
        .chats
        .create_chat(&user_id, &chat_type, &payload.name, &payload.user_ids)
        .await?;

    Ok((StatusCode::CREATED, Json(CreateChatResponse { chat_id })))
}

pub async fn list_chats(
    State(state): State<Arc<GatewayState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(params): Query<ListChatsQuery>,
) -> GatewayResult<Json<UserChatsResponse>> {
    let chat_type = require("type", params.chat_type)?;

    let chats = state
        .services
        .chats
        .get_user_chats(&user_id, &chat_type)
        .await?;

    Ok(Json(UserChatsResponse { chats }))
}

pub async fn get_chat(
    State(state): State<Arc<GatewayState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> GatewayResult<Json<ChatInfo>> {
    require_id("chat_id", &chat_id)?;

    let info = state
        .services
        .chats
        .get_chat_info(&user_id, &chat_id)
        .await?;

    Ok(Json(info))
}
