//! Repository traits for the post and comment write paths.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entity::{Comment, Post};
use crate::result::AppResult;

/// Storage used by comment creation.
///
/// Implemented by the PostgreSQL repository and by the in-memory store
/// used in development mode and tests.
#[async_trait]
pub trait CommentRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Returns whether a post with this ID exists.
    async fn post_exists(&self, post_id: Uuid) -> AppResult<bool>;

    /// Persist a new comment. Returns once the write has committed.
    async fn create(&self, comment: &Comment) -> AppResult<()>;
}

/// Storage used by post creation.
#[async_trait]
pub trait PostRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new post.
    async fn create_post(&self, post: &Post) -> AppResult<()>;
}
