//! Durable channel (message broker) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which durable channel implementation carries notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerProvider {
    /// Redis Streams.
    Redis,
    /// Process-local queue; only reaches consumers in the same process.
    Memory,
}

/// Durable channel settings shared by the gateway and the consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Channel backend.
    #[serde(default = "default_provider")]
    pub provider: BrokerProvider,
    /// Redis connection URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Name of the durable channel.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Consumer group shared by all notifier instances.
    #[serde(default = "default_group")]
    pub group: String,
    /// Name of this consumer inside the group. Defaults to `notifier-<hostname>`
    /// so a restarted notifier reuses its entry instead of adding a new one.
    #[serde(default = "default_consumer_name")]
    pub consumer_name: String,
    /// Upper bound on connect + declare + publish, in milliseconds.
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_ms: u64,
    /// How long a single receive blocks server-side, in milliseconds.
    /// Must stay below the client response timeout.
    #[serde(default = "default_block_ms")]
    pub block_ms: u64,
    /// Maximum messages returned by one receive.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Approximate cap on retained channel entries.
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Delay before the consumer retries after a broker error, in milliseconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            url: default_url(),
            channel: default_channel(),
            group: default_group(),
            consumer_name: default_consumer_name(),
            publish_timeout_ms: default_publish_timeout(),
            block_ms: default_block_ms(),
            batch_size: default_batch_size(),
            max_len: default_max_len(),
            reconnect_delay_ms: default_reconnect_delay(),
        }
    }
}

impl BrokerConfig {
    /// Publish timeout as a [`Duration`].
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }

    /// Consumer retry delay as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn default_provider() -> BrokerProvider {
    BrokerProvider::Redis
}

fn default_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_channel() -> String {
    "notifications".to_string()
}

fn default_group() -> String {
    "notification-service".to_string()
}

fn default_consumer_name() -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "local".to_string());
    format!("notifier-{host}")
}

fn default_publish_timeout() -> u64 {
    5000
}

fn default_block_ms() -> u64 {
    250
}

fn default_batch_size() -> usize {
    64
}

fn default_max_len() -> usize {
    10_000
}

fn default_reconnect_delay() -> u64 {
    1000
}
