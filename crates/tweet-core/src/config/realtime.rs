//! Real-time fan-out configuration.

use serde::{Deserialize, Serialize};

/// Notifier fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of the internal broadcast queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Per-connection outbound buffer; a full buffer counts as a failed write.
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer_size: usize,
    /// Deliver client-originated frames back to the client that sent them.
    #[serde(default = "default_true")]
    pub echo_to_sender: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            connection_buffer_size: default_connection_buffer(),
            echo_to_sender: true,
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_connection_buffer() -> usize {
    256
}

fn default_true() -> bool {
    true
}
