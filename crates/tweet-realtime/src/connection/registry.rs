//! The shared set of currently open connections.

use std::sync::Arc;

use dashmap::DashMap;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe membership set of live connections.
///
/// Every insert and removal is atomic per connection. [`snapshot`] clones
/// the handles out so callers can write to them without holding any
/// registry lock; a handle removed after the snapshot was taken simply
/// fails its write.
///
/// [`snapshot`]: ConnectionRegistry::snapshot
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            by_id: DashMap::new(),
        }
    }

    /// Adds a connection. Returns `false` if it was already present.
    pub fn add(&self, handle: Arc<ConnectionHandle>) -> bool {
        use dashmap::mapref::entry::Entry;

        match self.by_id.entry(handle.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(handle);
                true
            }
        }
    }

    /// Removes a connection, returning it if it was present.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.remove(conn_id).map(|(_, handle)| handle)
    }

    /// Checks whether a connection is registered.
    pub fn contains(&self, conn_id: &ConnectionId) -> bool {
        self.by_id.contains_key(conn_id)
    }

    /// Returns the current members for iteration outside the registry.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Removes and returns every connection.
    pub fn drain(&self) -> Vec<Arc<ConnectionHandle>> {
        let ids: Vec<ConnectionId> = self.by_id.iter().map(|entry| *entry.key()).collect();
        ids.iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Returns number of registered connections.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns whether no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
