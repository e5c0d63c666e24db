//! Individual client connection handle.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use uuid::Uuid;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Why a write to a connection did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The connection was closed or its writer has gone away.
    #[error("connection closed")]
    Closed,
    /// The client is not draining its outbound buffer.
    #[error("outbound buffer full")]
    Full,
}

/// A handle to a single live client connection.
///
/// The registry and the broadcaster hold shared references; the session
/// routine that accepted the transport owns the lifecycle and is told to
/// stop through [`ConnectionHandle::closed`].
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Peer address, when the transport exposes one
    pub remote_addr: Option<SocketAddr>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    close: CancellationToken,
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new handle and the receiving end of its outbound buffer.
    pub fn new(
        remote_addr: Option<SocketAddr>,
        buffer_size: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let handle = Self {
            id: Uuid::new_v4(),
            remote_addr,
            connected_at: Utc::now(),
            sender,
            close: CancellationToken::new(),
            alive: AtomicBool::new(true),
        };
        (handle, receiver)
    }

    /// Queue a payload for this connection without waiting.
    pub fn send(&self, payload: &str) -> Result<(), WriteError> {
        if !self.is_alive() {
            return Err(WriteError::Closed);
        }
        match self.sender.try_send(payload.to_owned()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(WriteError::Full),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                Err(WriteError::Closed)
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Mark the connection dead and tell its session routine to shut down.
    pub fn close(&self) {
        self.mark_dead();
        self.close.cancel();
    }

    /// Resolves once [`ConnectionHandle::close`] has been called.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.close.cancelled()
    }
}
