//! useragg — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use useragg_core::error::AggregateError;
use useragg_store::error::StoreError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The seed data for the in-memory sources could not be loaded.
    #[error("seed error: {0}")]
    Seed(#[from] StoreError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `AggregateError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub AggregateError);

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            AggregateError::ProfileNotFound(_) => (StatusCode::NOT_FOUND, "profile_not_found"),
            AggregateError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "upstream_failure"),
            AggregateError::DeadlineExceeded { .. } => {
                (StatusCode::GATEWAY_TIMEOUT, "deadline_exceeded")
            }
            AggregateError::Cancelled { .. } => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
            AggregateError::Incomplete { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
