use anyhow::{Context, Result};
use courier_chats::{ChatServices, MemoryStore, ServiceLimits};
use courier_config::AppConfig;
use courier_database::{initialize_database, sqlite_services};
use sqlx::SqlitePool;
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Service limits taken from the `chat` config section.
pub fn service_limits(config: &AppConfig) -> ServiceLimits {
    ServiceLimits {
        max_message_length: config.chat.max_message_length,
        subscriber_queue_capacity: config.chat.subscriber_queue_capacity,
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub chat: ChatServices,
    /// `None` when running on the in-process store.
    pub db_pool: Option<SqlitePool>,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let limits = service_limits(config);

        if config.database.is_memory() {
            warn!("using the in-memory store; nothing will survive a restart");
            return Ok(Self {
                chat: ChatServices::from_store(MemoryStore::new(), limits),
                db_pool: None,
            });
        }

        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        info!(
            max_message_length = limits.max_message_length,
            queue_capacity = limits.subscriber_queue_capacity,
            "chat services ready"
        );

        Ok(Self {
            chat: sqlite_services(db_pool.clone(), limits),
            db_pool: Some(db_pool),
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
