//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// External conversation service used for quote snapshots
    pub conversations: ConversationSettings,

    /// Chat limits
    #[serde(default)]
    pub chat: ChatSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// External CRM conversation service.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationSettings {
    /// Base URL; empty disables quoting
    pub base_url: String,

    /// Sent as the `api_access_token` header
    pub api_token: String,

    /// Upper bound for one snapshot fetch, in seconds
    pub timeout_secs: u64,
}

/// Limits applied by the chat orchestrator.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatSettings {
    /// Page size when the caller gives none
    pub default_page_size: u32,

    /// Hard cap on page size
    pub max_page_size: u32,

    /// Maximum message length in characters
    pub max_content_length: usize,

    /// Maximum group room name length in characters
    pub max_room_name_length: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 100,
            max_content_length: 4000,
            max_room_name_length: 100,
        }
    }
}

impl ChatSettings {
    /// Resolve a requested page size: missing or zero falls back to the
    /// default, anything above the cap is clamped.
    pub fn page_size(&self, requested: Option<u32>) -> i64 {
        let size = requested
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size);
        i64::from(size)
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Timelines never serve more than this many messages per page.
pub const MAX_PAGE_SIZE: u32 = 100;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the chat limits are out of range.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", false)?
            .set_default("conversations.base_url", "")?
            .set_default("conversations.api_token", "")?
            .set_default("conversations.timeout_secs", 10)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option(
                "conversations.base_url",
                std::env::var("CONVERSATIONS_BASE_URL").ok(),
            )?
            .set_override_option(
                "conversations.api_token",
                std::env::var("CONVERSATIONS_API_TOKEN").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.max_page_size == 0 || self.chat.max_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Message(format!(
                "chat.max_page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.chat.max_page_size
            )));
        }
        if self.conversations.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "conversations.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ConversationSettings {
    /// Quoting is only available when a base URL is configured.
    pub fn is_enabled(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
