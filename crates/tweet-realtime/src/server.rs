//! Top-level notifier engine that ties the fan-out pipeline together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use tweet_core::AppError;
use tweet_core::config::RealtimeConfig;

use crate::bridge::{ChannelConsumer, ChannelSource};
use crate::broadcaster::{BroadcastMessage, Broadcaster, broadcast_queue};
use crate::connection::ConnectionManager;
use crate::metrics::{MetricsSnapshot, RealtimeMetrics};

/// Owns the broadcaster, the channel consumer, and every open connection.
#[derive(Clone)]
pub struct NotifierEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Consumer side of the broadcast queue, taken on start.
    queue_rx: Arc<Mutex<Option<mpsc::Receiver<BroadcastMessage>>>>,
    /// Background task handles.
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    /// Shutdown signal for background tasks.
    shutdown: CancellationToken,
}

impl std::fmt::Debug for NotifierEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierEngine")
            .field("connections", &self.connections.connection_count())
            .finish()
    }
}

impl NotifierEngine {
    /// Creates the engine. Nothing runs until [`NotifierEngine::start`].
    pub fn new(config: RealtimeConfig) -> Self {
        let (queue_tx, queue_rx) = broadcast_queue(config.queue_capacity);
        let metrics = Arc::new(RealtimeMetrics::new());
        let connections = Arc::new(ConnectionManager::new(config, queue_tx, metrics.clone()));

        Self {
            connections,
            metrics,
            queue_rx: Arc::new(Mutex::new(Some(queue_rx))),
            tasks: Arc::new(Mutex::new(Vec::new())),
            shutdown: CancellationToken::new(),
        }
    }

    /// Spawns the broadcaster and the channel consumer.
    ///
    /// Fails if the engine was already started.
    pub async fn start(
        &self,
        source: Arc<dyn ChannelSource>,
        retry_delay: Duration,
    ) -> Result<(), AppError> {
        let rx = self
            .queue_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| AppError::internal("Notifier engine already started"))?;

        let broadcaster = Broadcaster::new(self.connections.clone());
        let consumer = ChannelConsumer::new(
            source,
            self.connections.queue(),
            self.metrics.clone(),
            retry_delay,
        );

        let mut tasks = self.tasks.lock().await;
        tasks.push(tokio::spawn(broadcaster.run(rx, self.shutdown.clone())));
        tasks.push(tokio::spawn(consumer.run(self.shutdown.clone())));

        info!("Notifier engine started");
        Ok(())
    }

    /// Current counters plus the live connection count.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.connections.connection_count())
    }

    /// Token cancelled when the engine shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stops background tasks and closes every connection.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down notifier engine");

        self.shutdown.cancel();
        self.connections.close_all();

        let handles: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Notifier task ended abnormally");
            }
        }

        info!("Notifier engine shut down");
        Ok(())
    }
}
