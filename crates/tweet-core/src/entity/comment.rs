//! Comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::result::AppResult;

/// A comment left by a user on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID.
    pub id: Uuid,
    /// Post the comment belongs to.
    pub post_id: Uuid,
    /// Author of the comment.
    pub owner_id: Uuid,
    /// Comment body.
    pub content: String,
    /// Like counter.
    pub likes: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time, if ever edited.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Build a new, not yet persisted comment.
    pub fn new(post_id: Uuid, owner_id: Uuid, content: impl Into<String>) -> AppResult<Self> {
        let content = content.into();

        if post_id.is_nil() {
            return Err(AppError::validation("Post ID is required"));
        }
        if owner_id.is_nil() {
            return Err(AppError::validation("Owner ID is required"));
        }
        if content.trim().is_empty() {
            return Err(AppError::validation("Comment content must not be empty"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            owner_id,
            content,
            likes: 0,
            created_at: Utc::now(),
            updated_at: None,
        })
    }
}
