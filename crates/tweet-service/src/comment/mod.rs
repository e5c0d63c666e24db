//! Comment creation and the notification it triggers.

pub mod service;

pub use service::CommentService;
