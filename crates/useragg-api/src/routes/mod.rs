//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod users;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/users", users::router())
        .with_state(state)
}
