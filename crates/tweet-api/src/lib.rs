//! # tweet-api
//!
//! HTTP layer for both processes of the tweet backend:
//!
//! - the writer router (`POST /v1/posts`, `POST /v1/posts/{post_id}/comments`, `GET /health`)
//! - the notifier router (WebSocket upgrade on the configured path, `GET /health`)
//!
//! Handlers translate [`tweet_core::AppError`] into HTTP responses through
//! [`error::ApiError`].

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{build_api_router, build_notifier_router};
pub use state::{ApiState, NotifierState};
