//! Durable channel seams used by the writer and the notifier.

use async_trait::async_trait;

use tweet_core::AppResult;

/// Publishes event payloads to the durable channel.
///
/// Each call is independent: it acquires whatever it needs, publishes once,
/// and releases everything before returning. Failures are reported, never
/// retried.
#[async_trait]
pub trait ChannelGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Publishes one payload.
    async fn publish(&self, payload: &str) -> AppResult<()>;
}

/// Receives payloads from the durable channel.
///
/// Messages are acknowledged as they are handed out. `receive` may wait for
/// new messages and may return an empty batch when nothing arrived.
#[async_trait]
pub trait ChannelSource: Send + Sync + std::fmt::Debug + 'static {
    /// Waits for the next batch of payloads, in channel order.
    async fn receive(&self) -> AppResult<Vec<String>>;
}
