//! Notification event and its wire encoding.
//!
//! The encoded form is a UTF-8 JSON object with stable field names:
//! `{"type": "comment", "postId": "...", "userId": "...", "message": "..."}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};
use crate::result::AppResult;

/// Content type attached to every published payload.
pub const CONTENT_TYPE: &str = "application/json";

/// Kind of domain event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A comment was created on a post.
    Comment,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => write!(f, "comment"),
        }
    }
}

/// Payload pushed to connected viewers.
///
/// Identifiers are carried as opaque strings; they are UUIDs when produced
/// by the writer but consumers must not rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Post the event concerns.
    #[serde(rename = "postId")]
    pub post_id: String,
    /// User who caused the event.
    #[serde(rename = "userId")]
    pub actor_id: String,
    /// Rendered, human-readable text.
    pub message: String,
}

impl NotificationEvent {
    /// Build an event from already rendered parts.
    pub fn new(
        kind: NotificationKind,
        post_id: impl fmt::Display,
        actor_id: impl fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            post_id: post_id.to_string(),
            actor_id: actor_id.to_string(),
            message: message.into(),
        }
    }

    /// Build the notification for a newly created comment.
    pub fn comment(post_id: impl fmt::Display, actor_id: impl fmt::Display) -> Self {
        let actor_id = actor_id.to_string();
        let message = format!("User {actor_id} commented on your post");
        Self::new(NotificationKind::Comment, post_id, actor_id, message)
    }

    /// Serialize into the wire payload. Has no side effects.
    pub fn encode(&self) -> AppResult<String> {
        serde_json::to_string(self).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to encode notification: {e}"),
                e,
            )
        })
    }

    /// Parse a wire payload.
    pub fn decode(payload: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(payload).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to decode notification: {e}"),
                e,
            )
        })
    }
}
