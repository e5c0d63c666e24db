//! Comment creation.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use tweet_core::entity::Comment;
use tweet_core::error::AppError;
use tweet_core::events::NotificationEvent;
use tweet_core::traits::CommentRepository;
use tweet_realtime::bridge::ChannelGateway;

/// Creates comments and announces them on the durable channel.
#[derive(Debug, Clone)]
pub struct CommentService {
    /// Comment repository.
    comment_repo: Arc<dyn CommentRepository>,
    /// Durable channel gateway.
    gateway: Arc<dyn ChannelGateway>,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(comment_repo: Arc<dyn CommentRepository>, gateway: Arc<dyn ChannelGateway>) -> Self {
        Self {
            comment_repo,
            gateway,
        }
    }

    /// Persists a comment, then publishes a notification for it.
    ///
    /// The notification runs after the write has committed. Encoding or
    /// publishing failures are logged and never change the result.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        content: String,
    ) -> Result<Comment, AppError> {
        if !self.comment_repo.post_exists(post_id).await? {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }

        let comment = Comment::new(post_id, owner_id, content)?;
        self.comment_repo.create(&comment).await?;

        info!(
            comment_id = %comment.id,
            post_id = %post_id,
            owner_id = %owner_id,
            "Comment created"
        );

        self.notify(&comment).await;

        Ok(comment)
    }

    async fn notify(&self, comment: &Comment) {
        let event = NotificationEvent::comment(comment.post_id, comment.owner_id);

        let payload = match event.encode() {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    post_id = %comment.post_id,
                    actor_id = %comment.owner_id,
                    error = %e,
                    "Failed to encode comment notification"
                );
                return;
            }
        };

        if let Err(e) = self.gateway.publish(&payload).await {
            warn!(
                post_id = %comment.post_id,
                actor_id = %comment.owner_id,
                error = %e,
                "Failed to publish comment notification"
            );
        }
    }
}
