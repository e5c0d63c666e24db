//! Post entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::result::AppResult;

/// A post that comments attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Build a new, not yet persisted post.
    pub fn new(owner_id: Uuid, content: impl Into<String>) -> AppResult<Self> {
        let content = content.into();

        if owner_id.is_nil() {
            return Err(AppError::validation("Owner ID is required"));
        }
        if content.trim().is_empty() {
            return Err(AppError::validation("Post content must not be empty"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            content,
            likes: 0,
            created_at: Utc::now(),
            updated_at: None,
        })
    }
}
