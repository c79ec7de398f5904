use std::path::Path;

use anyhow::{Context, Result};
use courier_config::{AppConfig, MEMORY_DATABASE_URL};
use courier_runtime::{service_limits, BackendServices};
use tempfile::TempDir;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(database_url: String, max_connections: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = database_url;
    config.database.max_connections = max_connections;
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_runs_migrations_for_sqlite() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/init.db");
    let config = build_config(sqlite_url(&db_path), 4);

    let services = initialise(&config).await?;
    let pool = services.db_pool.clone().expect("sqlite backend has a pool");
    let table: String = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'messages'",
    )
    .fetch_one(&pool)
    .await?;
    assert_eq!("messages", table);
    assert!(db_path.exists());

    let chat_id = services
        .chat
        .chats
        .create_chat("alice", "group", "Team", &["bob".to_string()])
        .await?;
    let info = services.chat.chats.get_chat_info("bob", &chat_id).await?;
    assert_eq!(info.channels.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_uses_memory_store_when_asked() -> Result<()> {
    let config = build_config(MEMORY_DATABASE_URL.to_string(), 1);

    let services = initialise(&config).await?;
    assert!(services.db_pool.is_none());

    let chat_id = services
        .chat
        .chats
        .create_chat("alice", "private", "", &["bob".to_string()])
        .await?;
    let info = services.chat.chats.get_chat_info("alice", &chat_id).await?;
    assert_eq!(info.name, "bob");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_limits_come_from_config() -> Result<()> {
    let mut config = build_config(MEMORY_DATABASE_URL.to_string(), 1);
    config.chat.max_message_length = 5;
    config.chat.subscriber_queue_capacity = 3;

    let limits = service_limits(&config);
    assert_eq!(limits.max_message_length, 5);
    assert_eq!(limits.subscriber_queue_capacity, 3);

    let services = initialise(&config).await?;
    assert_eq!(services.chat.registry.queue_capacity(), 3);
    assert_eq!(services.chat.messages.max_message_length(), 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_reports_unusable_database() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let config = build_config(sqlite_url(&blocker.join("db.sqlite")), 1);

    let error = match BackendServices::initialise(&config).await {
        Ok(_) => panic!("expected initialisation to fail"),
        Err(error) => error,
    };
    let message = format!("{error:?}");
    assert!(
        message.contains("failed to initialise database"),
        "expected database context, got {message}"
    );
}
