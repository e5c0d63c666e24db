//! Domain events that leave the writer process.
//!
//! Events are encoded by the writer, published to the durable channel,
//! and fanned out verbatim by the notifier.

pub mod notification;

pub use notification::{CONTENT_TYPE, NotificationEvent, NotificationKind};
