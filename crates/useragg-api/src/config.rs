//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Interface to bind (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port to bind (`PORT`, default `3000`).
    pub port: u16,
    /// Per-aggregation timeout (`AGGREGATE_TIMEOUT_MS`, `0` or unset for
    /// none).
    pub aggregate_timeout: Option<Duration>,
    /// JSON seed for the in-memory sources (`SEED_PATH`, unset for empty
    /// sources).
    pub seed_path: Option<PathBuf>,
    /// Simulated upstream latency (`UPSTREAM_LATENCY_MS`).
    pub upstream_latency: Option<Duration>,
}

impl ApiConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        Ok(Self {
            host,
            port,
            aggregate_timeout: millis(&lookup, "AGGREGATE_TIMEOUT_MS")?,
            seed_path: lookup("SEED_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            upstream_latency: millis(&lookup, "UPSTREAM_LATENCY_MS")?,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host` and `port` do not form a socket
    /// address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

/// Parses an optional millisecond duration; zero means unset.
fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let millis: u64 = raw
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} must be a whole number of milliseconds: {e}")))?;
    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}
