//! Route definitions for the writer and notifier processes.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::{ApiState, NotifierState};

/// Build the writer router.
pub fn build_api_router(state: ApiState) -> Router {
    let v1_routes = Router::new()
        .route("/posts", post(handlers::post::create_post))
        .route(
            "/posts/{post_id}/comments",
            post(handlers::comment::create_comment),
        );

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the notifier router with the WebSocket endpoint mounted at `ws_path`.
///
/// Upgrades are accepted from any origin.
pub fn build_notifier_router(state: NotifierState, ws_path: &str) -> Router {
    Router::new()
        .route(ws_path, get(handlers::ws::ws_upgrade))
        .route("/health", get(handlers::health::notifier_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
