//! # tweet-service
//!
//! Business logic service layer for the tweet backend. Services follow
//! constructor injection: repositories and the durable channel gateway are
//! provided at construction time as `Arc` trait objects.

pub mod comment;
pub mod post;

pub use comment::CommentService;
pub use post::PostService;
