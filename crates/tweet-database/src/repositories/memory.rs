//! Process-local post and comment store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use tweet_core::entity::{Comment, Post};
use tweet_core::error::AppError;
use tweet_core::result::AppResult;
use tweet_core::traits::{CommentRepository, PostRepository};

/// In-memory repositories used in development mode and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: DashMap<Uuid, Post>,
    comments: DashMap<Uuid, Comment>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an empty post with a known ID so comments can be attached to it.
    pub fn add_post(&self, post_id: Uuid) {
        self.posts.insert(
            post_id,
            Post {
                id: post_id,
                owner_id: Uuid::new_v4(),
                content: String::new(),
                likes: 0,
                created_at: Utc::now(),
                updated_at: None,
            },
        );
    }

    /// Looks up a stored post.
    pub fn get_post(&self, post_id: &Uuid) -> Option<Post> {
        self.posts.get(post_id).map(|entry| entry.value().clone())
    }

    /// Looks up a stored comment.
    pub fn get(&self, comment_id: &Uuid) -> Option<Comment> {
        self.comments.get(comment_id).map(|entry| entry.value().clone())
    }

    /// Returns all comments on a post, oldest first.
    pub fn comments_for_post(&self, post_id: &Uuid) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|entry| entry.value().post_id == *post_id)
            .map(|entry| entry.value().clone())
            .collect();
        comments.sort_by_key(|c| c.created_at);
        comments
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: &Post) -> AppResult<()> {
        if self.posts.contains_key(&post.id) {
            return Err(AppError::conflict(format!("Post {} already exists", post.id)));
        }
        self.posts.insert(post.id, post.clone());
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn post_exists(&self, post_id: Uuid) -> AppResult<bool> {
        Ok(self.posts.contains_key(&post_id))
    }

    async fn create(&self, comment: &Comment) -> AppResult<()> {
        if self.comments.contains_key(&comment.id) {
            return Err(AppError::conflict(format!(
                "Comment {} already exists",
                comment.id
            )));
        }
        self.comments.insert(comment.id, comment.clone());
        Ok(())
    }
}
