//! Repository for message data access operations.

use async_trait::async_trait;
use courier_chats::{ChatError, ChatResult, CreateMessageRequest, Message, MessageProvider, Page};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::{format_timestamp, parse_timestamp};
use crate::types::errors::storage;

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &SqliteRow) -> ChatResult<Message> {
    let created_at: String = row.try_get("created_at").map_err(storage)?;
    Ok(Message {
        id: row.try_get("id").map_err(storage)?,
        channel_id: row.try_get("channel_id").map_err(storage)?,
        text: row.try_get("text").map_err(storage)?,
        sender_id: row.try_get("sender_id").map_err(storage)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

#[async_trait]
impl MessageProvider for MessageRepository {
    async fn save_message(&self, message: CreateMessageRequest) -> ChatResult<Message> {
        let created_at = format_timestamp(message.created_at);

        let mut tx = self.pool.begin().await.map_err(storage)?;

        let parent: Option<i64> = sqlx::query_scalar("SELECT seq FROM channels WHERE id = ?")
            .bind(&message.channel_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?;
        if parent.is_none() {
            return Err(ChatError::ChannelNotFound);
        }

        sqlx::query(
            "INSERT INTO messages (id, channel_id, sender_id, text, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.channel_id)
        .bind(&message.sender_id)
        .bind(&message.text)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        info!(
            message_id = %message.id,
            channel_id = %message.channel_id,
            sender_id = %message.sender_id,
            "stored message"
        );

        // Return what a later read would return, at stored precision.
        let mut stored = message.into_message();
        stored.created_at = parse_timestamp(&created_at)?;
        Ok(stored)
    }

    async fn get_messages(&self, channel_id: &str, page: Page) -> ChatResult<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT id, channel_id, sender_id, text, created_at
             FROM messages WHERE channel_id = ?
             ORDER BY created_at DESC, seq DESC LIMIT ? OFFSET ?",
        )
        .bind(channel_id)
        .bind(i64::from(page.limit()))
        .bind(i64::from(page.skip()))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.iter().map(message_from_row).collect()
    }
}
