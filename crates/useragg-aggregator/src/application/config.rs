//! Construction-time configuration for [`UserAggregator`].
//!
//! [`UserAggregator`]: crate::application::aggregator::UserAggregator

use std::time::Duration;

use tracing::Dispatch;

/// Immutable settings fixed when an aggregator is built.
#[derive(Debug, Clone, Default)]
pub struct AggregatorConfig {
    /// Upper bound on a single aggregation. `None` or zero inherits the
    /// caller's deadline only.
    pub timeout: Option<Duration>,
    /// Where diagnostic events go. `None` uses the process-wide `tracing`
    /// subscriber, which discards everything when none is installed.
    pub diagnostics: Option<Dispatch>,
}

impl AggregatorConfig {
    /// Returns a copy with the given timeout.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Returns a copy that sends diagnostic events to `dispatch`.
    pub fn with_diagnostics(self, dispatch: Dispatch) -> Self {
        Self {
            diagnostics: Some(dispatch),
            ..self
        }
    }

    /// The timeout actually applied, with zero normalised to none.
    #[must_use]
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|timeout| !timeout.is_zero())
    }
}
