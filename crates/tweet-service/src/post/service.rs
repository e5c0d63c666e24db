//! Post creation.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tweet_core::entity::Post;
use tweet_core::error::AppError;
use tweet_core::traits::PostRepository;

/// Creates posts.
#[derive(Debug, Clone)]
pub struct PostService {
    /// Post repository.
    post_repo: Arc<dyn PostRepository>,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(post_repo: Arc<dyn PostRepository>) -> Self {
        Self { post_repo }
    }

    /// Persists a new post owned by `owner_id`.
    pub async fn create_post(&self, owner_id: Uuid, content: String) -> Result<Post, AppError> {
        let post = Post::new(owner_id, content)?;
        self.post_repo.create_post(&post).await?;

        info!(post_id = %post.id, owner_id = %owner_id, "Post created");
        Ok(post)
    }
}
