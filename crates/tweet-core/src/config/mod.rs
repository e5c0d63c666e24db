//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an optional environment overlay, and `TWEET__*`
//! environment variables. Every section has defaults, so an empty
//! configuration is valid.

pub mod broker;
pub mod database;
pub mod logging;
pub mod realtime;
pub mod server;

use serde::{Deserialize, Serialize};

pub use self::broker::{BrokerConfig, BrokerProvider};
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::server::{ApiServerConfig, NotifierServerConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Writer (REST API) server settings.
    #[serde(default)]
    pub api: ApiServerConfig,
    /// Notifier (websocket) server settings.
    #[serde(default)]
    pub notifier: NotifierServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Durable channel (message broker) settings.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Real-time fan-out settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, the `config/{env}` overlay and environment
    /// variables prefixed with `TWEET` (e.g. `TWEET__BROKER__URL`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TWEET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").expect("empty config");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.notifier.port, 8081);
        assert_eq!(config.notifier.path, "/ws");
        assert_eq!(config.broker.channel, "notifications");
        assert_eq!(config.broker.provider, BrokerProvider::Redis);
        assert!(config.realtime.echo_to_sender);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [broker]
            provider = "memory"
            publish_timeout_ms = 250

            [realtime]
            echo_to_sender = false
            queue_capacity = 8

            [database]
            provider = "memory"
            "#,
        )
        .expect("config");

        assert_eq!(config.broker.provider, BrokerProvider::Memory);
        assert_eq!(config.broker.publish_timeout_ms, 250);
        assert_eq!(config.broker.channel, "notifications");
        assert!(!config.realtime.echo_to_sender);
        assert_eq!(config.realtime.queue_capacity, 8);
        assert_eq!(config.database.provider, DatabaseProvider::Memory);
    }
}
