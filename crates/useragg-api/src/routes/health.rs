//! Liveness endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Liveness response, echoing the aggregation settings in force.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is answering.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Aggregation timeout in milliseconds, `null` when only caller deadlines
    /// apply.
    pub aggregate_timeout_ms: Option<u128>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        aggregate_timeout_ms: state
            .aggregator
            .config()
            .effective_timeout()
            .map(|timeout| timeout.as_millis()),
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
