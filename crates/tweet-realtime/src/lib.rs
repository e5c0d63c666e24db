//! # tweet-realtime
//!
//! Real-time notification fan-out for the tweet backend. Provides:
//!
//! - A durable channel gateway used by the writer to publish events
//! - A channel consumer that feeds published events into the notifier
//! - A concurrent registry of live client connections
//! - A single broadcaster that writes every queued message to every connection
//! - The [`NotifierEngine`] that owns and tears down all of the above

pub mod bridge;
pub mod broadcaster;
pub mod connection;
pub mod metrics;
pub mod server;

pub use bridge::{ChannelConsumer, ChannelGateway, ChannelSource, MemoryChannel};
pub use broadcaster::{BroadcastMessage, Broadcaster};
pub use connection::{ConnectionHandle, ConnectionId, ConnectionManager, ConnectionRegistry};
pub use metrics::RealtimeMetrics;
pub use server::NotifierEngine;
