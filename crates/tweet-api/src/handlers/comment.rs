//! Comment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use tweet_core::error::AppError;

use crate::dto::request::CreateCommentRequest;
use crate::dto::response::CommentResponse;
use crate::error::ApiError;
use crate::extractors::ActingUser;
use crate::state::ApiState;

/// POST /v1/posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<ApiState>,
    ActingUser(user_id): ActingUser,
    Path(post_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let post_id = Uuid::parse_str(&post_id)
        .map_err(|_| AppError::validation(format!("Invalid post ID: {post_id}")))?;

    let comment = state
        .comment_service
        .create_comment(post_id, user_id, req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}
