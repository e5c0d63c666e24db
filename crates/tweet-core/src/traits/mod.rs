//! Trait seams between the service layer and storage.

pub mod repository;

pub use repository::{CommentRepository, PostRepository};
