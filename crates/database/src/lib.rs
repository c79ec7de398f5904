//! Courier Database Crate
//!
//! SQLite storage for Courier: connection management, embedded migrations
//! and the repositories that implement the chat provider traits.

use std::sync::Arc;

use courier_chats::{ChatServices, ServiceLimits};
use courier_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{ping, prepare_database};
pub use migrations::run_migrations;
pub use repos::{ChannelRepository, ChatRepository, MessageRepository};
pub use types::{DatabaseError, DatabaseResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

/// Chat services backed by SQLite repositories sharing `pool`.
pub fn sqlite_services(pool: SqlitePool, limits: ServiceLimits) -> ChatServices {
    ChatServices::new(
        Arc::new(ChatRepository::new(pool.clone())),
        Arc::new(ChannelRepository::new(pool.clone())),
        Arc::new(MessageRepository::new(pool)),
        limits,
    )
}
