//! Connection lifecycle and inbound frame routing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tweet_core::config::RealtimeConfig;

use crate::broadcaster::BroadcastMessage;
use crate::metrics::RealtimeMetrics;

use super::handle::{ConnectionHandle, ConnectionId, WriteError};
use super::registry::ConnectionRegistry;

/// Owns the registry and the producer side of the broadcast queue.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Live connections.
    registry: Arc<ConnectionRegistry>,
    /// Producer side of the broadcast queue.
    queue: mpsc::Sender<BroadcastMessage>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        queue: mpsc::Sender<BroadcastMessage>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            queue,
            metrics,
            config,
        }
    }

    /// Registers a newly upgraded connection.
    ///
    /// Returns the handle and the receiver the session's writer drains.
    pub fn register(
        &self,
        remote_addr: Option<SocketAddr>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (handle, rx) = ConnectionHandle::new(remote_addr, self.config.connection_buffer_size);
        let handle = Arc::new(handle);

        self.metrics.inc_opened();
        self.registry.add(handle.clone());

        info!(
            conn_id = %handle.id,
            remote_addr = ?remote_addr,
            active = self.registry.len(),
            "Client connected"
        );

        (handle, rx)
    }

    /// Unregisters a connection. A no-op if it was already pruned.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.registry.remove(conn_id) {
            handle.close();
            self.metrics.inc_closed();

            let duration = chrono::Utc::now() - handle.connected_at;
            info!(
                conn_id = %conn_id,
                session_secs = duration.num_seconds(),
                active = self.registry.len(),
                "Client disconnected"
            );
        }
    }

    /// Removes a connection after a failed write and closes its session.
    pub fn prune(&self, handle: &ConnectionHandle, reason: &WriteError) {
        if self.registry.remove(&handle.id).is_some() {
            self.metrics.inc_pruned();
            self.metrics.inc_closed();
            warn!(
                conn_id = %handle.id,
                reason = %reason,
                "Write to client failed, dropping connection"
            );
        }
        handle.close();
    }

    /// Queues a client text frame for broadcast.
    ///
    /// Waits for room in the queue, so a flooding client is slowed down
    /// rather than dropped.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, payload: String) {
        self.metrics.inc_from_clients();
        debug!(conn_id = %conn_id, len = payload.len(), "Inbound client frame");

        if self
            .queue
            .send(BroadcastMessage::from_client(payload, *conn_id))
            .await
            .is_err()
        {
            debug!(conn_id = %conn_id, "Broadcast queue closed, dropping client frame");
        }
    }

    /// Current members of the registry.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.registry.snapshot()
    }

    /// Closes every open connection.
    pub fn close_all(&self) {
        let handles = self.registry.drain();
        let count = handles.len();
        for handle in handles {
            handle.close();
            self.metrics.inc_closed();
        }
        if count > 0 {
            info!(count = count, "Closed all client connections");
        }
    }

    /// Returns the number of open connections.
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Checks whether a connection is still registered.
    pub fn is_connected(&self, conn_id: &ConnectionId) -> bool {
        self.registry.contains(conn_id)
    }

    /// Producer handle for the broadcast queue.
    pub fn queue(&self) -> mpsc::Sender<BroadcastMessage> {
        self.queue.clone()
    }

    /// Shared metrics.
    pub fn metrics(&self) -> &Arc<RealtimeMetrics> {
        &self.metrics
    }

    /// Whether client frames are echoed back to their sender.
    pub fn echo_to_sender(&self) -> bool {
        self.config.echo_to_sender
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcaster::broadcast_queue;

    fn manager() -> (ConnectionManager, mpsc::Receiver<BroadcastMessage>) {
        let (tx, rx) = broadcast_queue(8);
        (
            ConnectionManager::new(RealtimeConfig::default(), tx, Arc::new(RealtimeMetrics::new())),
            rx,
        )
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let (manager, _rx) = manager();
        let (handle, _out) = manager.register(None);

        assert_eq!(manager.connection_count(), 1);
        manager.unregister(&handle.id);
        manager.unregister(&handle.id);

        assert_eq!(manager.connection_count(), 0);
        assert!(!handle.is_alive());
        let snapshot = manager.metrics().snapshot(0);
        assert_eq!(snapshot.connections_opened, 1);
        assert_eq!(snapshot.connections_closed, 1);
    }

    #[tokio::test]
    async fn test_inbound_frame_is_queued_with_origin() {
        let (manager, mut rx) = manager();
        let (handle, _out) = manager.register(None);

        manager.handle_inbound(&handle.id, "ping".to_string()).await;

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.payload, "ping");
        assert_eq!(msg.origin, Some(handle.id));
    }

    #[tokio::test]
    async fn test_prune_then_unregister_counts_once() {
        let (manager, _rx) = manager();
        let (handle, _out) = manager.register(None);

        manager.prune(&handle, &WriteError::Full);
        manager.unregister(&handle.id);

        let snapshot = manager.metrics().snapshot(manager.connection_count());
        assert_eq!(snapshot.active_connections, 0);
        assert_eq!(snapshot.connections_pruned, 1);
        assert_eq!(snapshot.connections_closed, 1);
    }

    #[tokio::test]
    async fn test_close_all_wakes_sessions() {
        let (manager, _rx) = manager();
        let (a, _a_out) = manager.register(None);
        let (b, _b_out) = manager.register(None);

        manager.close_all();

        a.closed().await;
        b.closed().await;
        assert_eq!(manager.connection_count(), 0);
    }
}
