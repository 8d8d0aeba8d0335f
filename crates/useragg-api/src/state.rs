//! Shared application state.

use std::sync::Arc;

use useragg_aggregator::application::aggregator::UserAggregator;
use useragg_aggregator::application::config::AggregatorConfig;
use useragg_store::memory::stores_from_seed;
use useragg_store::seed::Seed;

use crate::config::ApiConfig;
use crate::error::AppError;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The aggregator serving every request.
    pub aggregator: Arc<UserAggregator>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(aggregator: Arc<UserAggregator>) -> Self {
        Self { aggregator }
    }

    /// Builds the aggregator over in-memory sources described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Seed` if the configured seed file cannot be loaded.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppError> {
        let seed = match &config.seed_path {
            Some(path) => Seed::from_path(path)?,
            None => Seed::default(),
        };
        let (profiles, orders) = stores_from_seed(seed, config.upstream_latency);
        let aggregator_config = AggregatorConfig {
            timeout: config.aggregate_timeout,
            ..AggregatorConfig::default()
        };

        Ok(Self::new(Arc::new(UserAggregator::new(
            Arc::new(profiles),
            Arc::new(orders),
            aggregator_config,
        ))))
    }
}
