//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/posts/{post_id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    /// Comment text.
    pub content: String,
}

/// Body of `POST /v1/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    /// Post text.
    pub content: String,
}
