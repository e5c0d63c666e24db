//! Notifier fan-out counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters shared by the connection manager, consumer, and broadcaster.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Connections accepted since start
    pub connections_opened: AtomicU64,
    /// Connections that ended since start
    pub connections_closed: AtomicU64,
    /// Connections removed by the broadcaster after a failed write
    pub connections_pruned: AtomicU64,
    /// Messages taken from the durable channel
    pub messages_from_channel: AtomicU64,
    /// Text frames received from clients
    pub messages_from_clients: AtomicU64,
    /// Messages processed by the broadcaster
    pub broadcasts: AtomicU64,
    /// Successful per-connection writes
    pub deliveries: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an accepted connection
    pub fn inc_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an ended connection
    pub fn inc_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a connection dropped after a failed write
    pub fn inc_pruned(&self) {
        self.connections_pruned.fetch_add(1, Ordering::Relaxed);
    }

    /// Count messages taken from the durable channel
    pub fn inc_from_channel(&self, count: u64) {
        self.messages_from_channel.fetch_add(count, Ordering::Relaxed);
    }

    /// Count a frame received from a client
    pub fn inc_from_clients(&self) {
        self.messages_from_clients.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a message handled by the broadcaster
    pub fn inc_broadcasts(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    /// Count successful per-connection writes
    pub fn inc_deliveries(&self, count: u64) {
        self.deliveries.fetch_add(count, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    ///
    /// `active_connections` comes from the registry, which is the source of
    /// truth for current membership.
    pub fn snapshot(&self, active_connections: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            active_connections,
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            connections_pruned: self.connections_pruned.load(Ordering::Relaxed),
            messages_from_channel: self.messages_from_channel.load(Ordering::Relaxed),
            messages_from_clients: self.messages_from_clients.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Connections currently in the registry
    pub active_connections: usize,
    /// Connections accepted since start
    pub connections_opened: u64,
    /// Connections that ended since start
    pub connections_closed: u64,
    /// Connections dropped after a failed write
    pub connections_pruned: u64,
    /// Messages taken from the durable channel
    pub messages_from_channel: u64,
    /// Frames received from clients
    pub messages_from_clients: u64,
    /// Messages handled by the broadcaster
    pub broadcasts: u64,
    /// Successful per-connection writes
    pub deliveries: u64,
}
