//! Client connection handles and their registry.

pub mod handle;
pub mod manager;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionId, WriteError};
pub use manager::ConnectionManager;
pub use registry::ConnectionRegistry;
