//! Routes for per-user aggregation.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use useragg_core::model::{AggregatedProfile, UserId};
use useragg_core::scope::{Scope, derive_scope};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for GET /{user_id}/aggregate.
#[derive(Debug, Default, Deserialize)]
pub struct AggregateQuery {
    /// Deadline for this request, in milliseconds. Combined with the server's
    /// own aggregation timeout, the tighter one wins.
    pub timeout_ms: Option<u64>,
}

/// Response body for a successful aggregation.
#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    /// The user that was aggregated.
    pub user_id: UserId,
    /// One line per order the user owns.
    pub items: Vec<AggregatedProfile>,
}

/// GET /{user_id}/aggregate
///
/// The request scope is released when the handler returns or is dropped, so a
/// client disconnect stops both fetches.
#[instrument(skip_all, fields(user_id = %user_id))]
async fn aggregate_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<AggregateQuery>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let request_scope = derive_scope(&Scope::root(), query.timeout_ms.map(Duration::from_millis));

    info!(timeout_ms = query.timeout_ms, "handling aggregate request");

    let items = state.aggregator.aggregate(&request_scope, user_id).await?;

    Ok(Json(AggregateResponse { user_id, items }))
}

/// Returns the router for user aggregation.
pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}/aggregate", get(aggregate_user))
}
