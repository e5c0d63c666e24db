//! PostgreSQL comment repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tweet_core::entity::Comment;
use tweet_core::error::{AppError, ErrorKind};
use tweet_core::result::AppResult;
use tweet_core::traits::CommentRepository;

/// Repository for the comment write path.
#[derive(Debug, Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn post_exists(&self, post_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up post", e))
    }

    async fn create(&self, comment: &Comment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, owner_id, content, likes, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.owner_id)
        .bind(&comment.content)
        .bind(comment.likes)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))?;

        Ok(())
    }
}
