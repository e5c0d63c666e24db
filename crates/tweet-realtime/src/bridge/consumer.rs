//! Moves durable channel messages onto the broadcast queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::broadcaster::BroadcastMessage;
use crate::metrics::RealtimeMetrics;

use super::channel::ChannelSource;

/// Single long-running task feeding the broadcaster from the durable channel.
#[derive(Debug)]
pub struct ChannelConsumer {
    source: Arc<dyn ChannelSource>,
    queue: mpsc::Sender<BroadcastMessage>,
    metrics: Arc<RealtimeMetrics>,
    retry_delay: Duration,
}

impl ChannelConsumer {
    /// Creates a consumer that forwards from `source` into `queue`,
    /// waiting `retry_delay` after a failed receive.
    pub fn new(
        source: Arc<dyn ChannelSource>,
        queue: mpsc::Sender<BroadcastMessage>,
        metrics: Arc<RealtimeMetrics>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            source,
            queue,
            metrics,
            retry_delay,
        }
    }

    /// Receives until `shutdown` is cancelled or the broadcast queue closes.
    ///
    /// Payloads are forwarded unmodified. Broker errors are logged and the
    /// receive is retried after `retry_delay`.
    pub async fn run(self, shutdown: CancellationToken) {
        info!("Channel consumer started");

        'outer: loop {
            let batch = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                received = self.source.receive() => received,
            };

            match batch {
                Ok(payloads) => {
                    if payloads.is_empty() {
                        continue;
                    }
                    self.metrics.inc_from_channel(payloads.len() as u64);
                    debug!(count = payloads.len(), "Received from durable channel");

                    for payload in payloads {
                        if self.queue.send(BroadcastMessage::external(payload)).await.is_err() {
                            info!("Broadcast queue closed");
                            break 'outer;
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "Durable channel receive failed");
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }

        info!("Channel consumer stopped");
    }
}
