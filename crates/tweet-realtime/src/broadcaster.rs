//! The single task that fans queued messages out to every
//! open connection.
//!
//! Messages are taken from the broadcast queue one at a time and written
//! to a snapshot of the registry before the next one is taken, so every
//! connection observes messages in queue order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::connection::{ConnectionId, ConnectionManager};
use crate::metrics::RealtimeMetrics;

/// One unit of work for the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage {
    /// Opaque text delivered verbatim.
    pub payload: String,
    /// Connection that sent the frame; `None` for durable channel messages.
    pub origin: Option<ConnectionId>,
}

impl BroadcastMessage {
    /// A message that arrived from the durable channel.
    pub fn external(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            origin: None,
        }
    }

    /// A text frame sent by a connected client.
    pub fn from_client(payload: impl Into<String>, origin: ConnectionId) -> Self {
        Self {
            payload: payload.into(),
            origin: Some(origin),
        }
    }
}

/// Creates the bounded broadcast queue.
pub fn broadcast_queue(
    capacity: usize,
) -> (mpsc::Sender<BroadcastMessage>, mpsc::Receiver<BroadcastMessage>) {
    mpsc::channel(capacity.max(1))
}

/// Outcome of fanning one message out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Connections the payload was written to.
    pub delivered: usize,
    /// Connections removed because the write failed.
    pub pruned: usize,
    /// Connections skipped because they sent the message.
    pub skipped: usize,
}

/// Drains the broadcast queue and writes to every registered connection.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    connections: Arc<ConnectionManager>,
    metrics: Arc<RealtimeMetrics>,
    echo_to_sender: bool,
}

impl Broadcaster {
    /// Creates a broadcaster over the manager's registry, metrics and echo setting.
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        let metrics = connections.metrics().clone();
        let echo_to_sender = connections.echo_to_sender();
        Self {
            connections,
            metrics,
            echo_to_sender,
        }
    }

    /// Runs until the queue closes or `shutdown` is cancelled.
    pub async fn run(
        self,
        mut rx: mpsc::Receiver<BroadcastMessage>,
        shutdown: CancellationToken,
    ) {
        info!(echo_to_sender = self.echo_to_sender, "Broadcaster started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                next = rx.recv() => match next {
                    Some(msg) => {
                        self.dispatch(&msg);
                    }
                    None => break,
                },
            }
        }

        info!("Broadcaster stopped");
    }

    /// Writes one message to every connection in the current snapshot.
    ///
    /// A failed write removes that connection and does not affect the
    /// remaining ones.
    pub fn dispatch(&self, msg: &BroadcastMessage) -> DispatchReport {
        let mut report = DispatchReport::default();

        for handle in self.connections.snapshot() {
            if !self.echo_to_sender && msg.origin == Some(handle.id) {
                report.skipped += 1;
                continue;
            }

            match handle.send(&msg.payload) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    self.connections.prune(&handle, &e);
                    report.pruned += 1;
                }
            }
        }

        self.metrics.inc_broadcasts();
        self.metrics.inc_deliveries(report.delivered as u64);

        debug!(
            origin = ?msg.origin,
            delivered = report.delivered,
            pruned = report.pruned,
            "Broadcast dispatched"
        );

        report
    }
}
