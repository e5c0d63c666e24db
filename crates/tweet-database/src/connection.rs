//! PostgreSQL pool for the post and comment repositories.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use tweet_core::config::DatabaseConfig;
use tweet_core::error::{AppError, ErrorKind};

/// Shared PostgreSQL pool. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Opens the pool described by `config`.
    ///
    /// The URL is parsed first so a malformed value is reported as a
    /// configuration error rather than a connection failure. Only the
    /// target (host, port, database, user) is logged.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let target = connect_options(&config.url)?;

        info!(
            host = target.get_host(),
            port = target.get_port(),
            database = target.get_database().unwrap_or_default(),
            user = target.get_username(),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = pool_options(config)
            .connect_with(target)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("PostgreSQL pool ready");
        Ok(Self { pool })
    }

    /// The underlying sqlx pool, for repositories and migrations.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Waits for in-flight queries and closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

fn connect_options(url: &str) -> Result<PgConnectOptions, AppError> {
    url.parse::<PgConnectOptions>().map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Invalid database URL: {e}"),
            e,
        )
    })
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}
