//! PostgreSQL post repository.

use async_trait::async_trait;
use sqlx::PgPool;

use tweet_core::entity::Post;
use tweet_core::error::{AppError, ErrorKind};
use tweet_core::result::AppResult;
use tweet_core::traits::PostRepository;

/// Repository for post creation.
#[derive(Debug, Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create_post(&self, post: &Post) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO posts (id, owner_id, content, likes, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(post.id)
        .bind(post.owner_id)
        .bind(&post.content)
        .bind(post.likes)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))?;

        Ok(())
    }
}
