//! Store error types.

use thiserror::Error;

/// Errors raised while loading seed data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The seed file could not be read.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed file is not valid JSON for the expected shape.
    #[error("failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The seed data violates a model invariant.
    #[error("invalid seed data: {0}")]
    Validation(String),
}
