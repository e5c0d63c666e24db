//! Shared handler state for the writer and notifier routers.

use std::sync::Arc;

use tweet_realtime::NotifierEngine;
use tweet_service::{CommentService, PostService};

/// State for the writer (REST API) process.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Post creation service.
    pub post_service: Arc<PostService>,
    /// Comment creation service.
    pub comment_service: Arc<CommentService>,
}

/// State for the notifier process.
#[derive(Debug, Clone)]
pub struct NotifierState {
    /// Fan-out engine owning every open connection.
    pub engine: NotifierEngine,
}
