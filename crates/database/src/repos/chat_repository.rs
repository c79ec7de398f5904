//! Repository for chat data access operations.

use async_trait::async_trait;
use chrono::Utc;
use courier_chats::{
    entities::member_key, Chat, ChatProvider, ChatResult, ChatType, CreateChatRequest, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::{decode_error, format_timestamp};
use crate::types::errors::storage;

/// Repository for chat database operations
#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attach member and channel ids to a `chats` row.
    async fn hydrate(&self, row: SqliteRow) -> ChatResult<Chat> {
        let id: String = row.try_get("id").map_err(storage)?;
        let chat_type: String = row.try_get("chat_type").map_err(storage)?;
        let name: String = row.try_get("name").map_err(storage)?;

        let member_ids: Vec<UserId> = sqlx::query_scalar(
            "SELECT user_id FROM chat_members WHERE chat_id = ? ORDER BY position",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        let channel_ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM channels WHERE chat_id = ? ORDER BY seq")
                .bind(&id)
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;

        Ok(Chat {
            chat_type: chat_type
                .parse()
                .map_err(|_| decode_error("chat type", &chat_type))?,
            id,
            name,
            member_ids,
            channel_ids,
        })
    }
}

#[async_trait]
impl ChatProvider for ChatRepository {
    async fn save_chat(&self, chat: CreateChatRequest) -> ChatResult<Chat> {
        let key = member_key(&chat.member_ids);
        let now = format_timestamp(Utc::now());

        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query(
            "INSERT INTO chats (id, chat_type, name, member_key, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&chat.id)
        .bind(chat.chat_type.as_str())
        .bind(&chat.name)
        .bind(&key)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        for (position, user_id) in chat.member_ids.iter().enumerate() {
            sqlx::query("INSERT INTO chat_members (chat_id, user_id, position) VALUES (?, ?, ?)")
                .bind(&chat.id)
                .bind(user_id)
                .bind(position as i64)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;

        info!(
            chat_id = %chat.id,
            chat_type = %chat.chat_type,
            members = chat.member_ids.len(),
            "stored chat"
        );
        Ok(chat.into_chat())
    }

    async fn find_chat(
        &self,
        chat_type: ChatType,
        member_ids: &[UserId],
    ) -> ChatResult<Option<Chat>> {
        let row = sqlx::query(
            "SELECT id, chat_type, name FROM chats WHERE chat_type = ? AND member_key = ? ORDER BY seq LIMIT 1",
        )
        .bind(chat_type.as_str())
        .bind(member_key(member_ids))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_chat_by_id(&self, chat_id: &str) -> ChatResult<Option<Chat>> {
        let row = sqlx::query("SELECT id, chat_type, name FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_user_chats(&self, user_id: &str, chat_type: ChatType) -> ChatResult<Vec<Chat>> {
        let rows = sqlx::query(
            "SELECT c.id, c.chat_type, c.name
             FROM chats c
             JOIN chat_members m ON m.chat_id = c.id
             WHERE m.user_id = ? AND c.chat_type = ?
             ORDER BY c.seq",
        )
        .bind(user_id)
        .bind(chat_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in rows {
            chats.push(self.hydrate(row).await?);
        }
        Ok(chats)
    }
}
