//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{HealthResponse, NotifierHealthResponse};
use crate::state::NotifierState;

/// GET /health on the writer
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health on the notifier
pub async fn notifier_health(State(state): State<NotifierState>) -> Json<NotifierHealthResponse> {
    Json(NotifierHealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        realtime: state.engine.metrics_snapshot(),
    })
}
