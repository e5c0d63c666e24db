//! Post handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::CreatePostRequest;
use crate::dto::response::PostResponse;
use crate::error::ApiError;
use crate::extractors::ActingUser;
use crate::state::ApiState;

/// POST /v1/posts
pub async fn create_post(
    State(state): State<ApiState>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = state.post_service.create_post(user_id, req.content).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}
