//! Identifies the caller from the `X-User-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use tweet_core::error::AppError;

use crate::error::ApiError;

/// Header carrying the caller's user ID, set by the upstream auth gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user performing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub Uuid);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing X-User-Id header"))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::authentication("Invalid X-User-Id header"))?;

        if user_id.is_nil() {
            return Err(AppError::authentication("Invalid X-User-Id header").into());
        }

        Ok(Self(user_id))
    }
}
