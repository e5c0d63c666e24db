//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tweet_core::entity::{Comment, Post};
use tweet_realtime::metrics::MetricsSnapshot;

/// A created comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            owner_id: c.owner_id,
            content: c.content,
            likes: c.likes,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// A created post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            content: p.content,
            likes: p.likes,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Notifier health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierHealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Fan-out counters.
    pub realtime: MetricsSnapshot,
}
