//! Repository for channel data access operations.

use async_trait::async_trait;
use chrono::Utc;
use courier_chats::{Channel, ChannelId, ChannelProvider, ChatError, ChatResult, CreateChannelRequest};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::{decode_error, format_timestamp};
use crate::types::errors::storage;

/// Repository for channel database operations
#[derive(Clone)]
pub struct ChannelRepository {
    pool: SqlitePool,
}

impl ChannelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_row(&self, channel_id: &str) -> ChatResult<Option<Channel>> {
        let row = sqlx::query("SELECT id, chat_id, name, channel_type FROM channels WHERE id = ?")
            .bind(channel_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        row.map(channel_from_row).transpose()
    }
}

fn channel_from_row(row: SqliteRow) -> ChatResult<Channel> {
    let channel_type: String = row.try_get("channel_type").map_err(storage)?;

    Ok(Channel {
        id: row.try_get("id").map_err(storage)?,
        chat_id: row.try_get("chat_id").map_err(storage)?,
        name: row.try_get("name").map_err(storage)?,
        channel_type: channel_type
            .parse()
            .map_err(|_| decode_error("channel type", &channel_type))?,
        message_ids: Vec::new(),
    })
}

#[async_trait]
impl ChannelProvider for ChannelRepository {
    async fn save_channel(&self, channel: CreateChannelRequest) -> ChatResult<Channel> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let parent: Option<i64> = sqlx::query_scalar("SELECT seq FROM chats WHERE id = ?")
            .bind(&channel.chat_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?;
        if parent.is_none() {
            return Err(ChatError::ChatNotFound);
        }

        sqlx::query(
            "INSERT INTO channels (id, chat_id, name, channel_type, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&channel.id)
        .bind(&channel.chat_id)
        .bind(&channel.name)
        .bind(channel.channel_type.as_str())
        .bind(format_timestamp(Utc::now()))
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        info!(channel_id = %channel.id, chat_id = %channel.chat_id, "stored channel");
        Ok(channel.into_channel())
    }

    async fn find_channel_by_id(&self, channel_id: &str) -> ChatResult<Option<Channel>> {
        let Some(mut channel) = self.find_row(channel_id).await? else {
            return Ok(None);
        };

        channel.message_ids =
            sqlx::query_scalar("SELECT id FROM messages WHERE channel_id = ? ORDER BY seq")
                .bind(&channel.id)
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;
        Ok(Some(channel))
    }

    async fn find_channel_summary(&self, channel_id: &str) -> ChatResult<Option<Channel>> {
        self.find_row(channel_id).await
    }

    async fn find_channels_by_ids(&self, channel_ids: &[ChannelId]) -> ChatResult<Vec<Channel>> {
        let mut channels = Vec::with_capacity(channel_ids.len());
        for channel_id in channel_ids {
            if let Some(channel) = self.find_channel_by_id(channel_id).await? {
                channels.push(channel);
            }
        }
        Ok(channels)
    }
}
