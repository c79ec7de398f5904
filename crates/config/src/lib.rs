use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "courier.toml",
    "config/courier.toml",
    "crates/config/courier.toml",
    "../courier.toml",
    "../config/courier.toml",
    "../crates/config/courier.toml",
];

/// Database url that selects the in-process providers instead of SQLite.
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Secret shipped in the defaults. Running with it outside of tests is a
/// configuration mistake and gets logged.
pub const DEFAULT_APP_SECRET: &str = "change-me";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub chat: ChatConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://courier.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Limits applied by the message service and the subscription registry.
///
/// ```
/// use courier_config::ChatConfig;
///
/// let chat = ChatConfig::default();
/// assert_eq!(chat.max_message_length, 1000);
/// assert_eq!(chat.subscriber_queue_capacity, 16);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Upper bound on message text, counted in characters.
    #[serde(default = "ChatConfig::default_max_message_length")]
    pub max_message_length: usize,
    /// Events buffered per live subscriber before broadcasts start dropping.
    #[serde(default = "ChatConfig::default_subscriber_queue_capacity")]
    pub subscriber_queue_capacity: usize,
}

impl ChatConfig {
    const fn default_max_message_length() -> usize {
        1000
    }

    const fn default_subscriber_queue_capacity() -> usize {
        16
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: Self::default_max_message_length(),
            subscriber_queue_capacity: Self::default_subscriber_queue_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret used to verify principal tokens.
    pub app_secret: String,
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            app_secret: DEFAULT_APP_SECRET.to_string(),
            leeway_seconds: 0,
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use courier_config::load;
///
/// std::env::remove_var("COURIER_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default(
            "chat.max_message_length",
            saturating_i64(defaults.chat.max_message_length as u64),
        )?
        .set_default(
            "chat.subscriber_queue_capacity",
            saturating_i64(defaults.chat.subscriber_queue_capacity as u64),
        )?
        .set_default("auth.app_secret", defaults.auth.app_secret.clone())?
        .set_default(
            "auth.leeway_seconds",
            saturating_i64(defaults.auth.leeway_seconds),
        )?;

    let environment_overrides = config::Environment::with_prefix("COURIER").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("COURIER_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via COURIER_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    validate(&config)?;

    if config.auth.app_secret == DEFAULT_APP_SECRET {
        warn!("auth.app_secret is left at its default value");
    }

    debug!(
        http = ?config.http,
        database = ?config.database,
        chat = ?config.chat,
        "loaded backend configuration"
    );
    Ok(config)
}

/// Reject values that would leave the services unusable.
pub fn validate(config: &AppConfig) -> anyhow::Result<()> {
    ensure!(
        config.chat.max_message_length > 0,
        "chat.max_message_length must be at least 1"
    );
    ensure!(
        config.chat.subscriber_queue_capacity > 0,
        "chat.subscriber_queue_capacity must be at least 1"
    );
    ensure!(
        !config.auth.app_secret.is_empty(),
        "auth.app_secret must not be empty"
    );
    ensure!(
        config.database.max_connections > 0,
        "database.max_connections must be at least 1"
    );
    Ok(())
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
