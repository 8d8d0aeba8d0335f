//! Error types for scopes, upstream lookups and aggregation.

use std::fmt;

use thiserror::Error;

use crate::model::UserId;

/// Why an execution scope is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The scope, or one of its ancestors, was cancelled.
    #[error("scope cancelled")]
    Cancelled,

    /// The scope's deadline elapsed.
    #[error("scope deadline exceeded")]
    DeadlineExceeded,
}

/// Error reported by an upstream profile or order source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The upstream could not serve the request.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// The lookup abandoned its work because its scope finished.
    #[error(transparent)]
    Scope(#[from] ScopeError),
}

/// Which of the two concurrent fetches produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// The profile fetch.
    Profile,
    /// The orders fetch.
    Orders,
}

impl Branch {
    /// Stable lowercase name, used in log fields and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error returned by an aggregation call.
///
/// An aggregation either returns its full result or exactly one of these;
/// partial results are never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// A fetch reported an upstream error.
    #[error("{branch} fetch failed: {source}")]
    Upstream {
        /// The fetch that failed.
        branch: Branch,
        /// The error reported by the upstream.
        #[source]
        source: LookupError,
    },

    /// The aggregator's own timeout elapsed before both fetches completed.
    #[error("{branch} fetch did not complete before the aggregation deadline")]
    DeadlineExceeded {
        /// The fetch that was cut short.
        branch: Branch,
    },

    /// The caller's scope was cancelled or expired before both fetches
    /// completed.
    #[error("{branch} fetch cancelled by caller")]
    Cancelled {
        /// The fetch that was cut short.
        branch: Branch,
    },

    /// The profile source has no profile for the requested user.
    #[error("profile not found for user {0}")]
    ProfileNotFound(UserId),

    /// A fetch reported success without leaving a result behind.
    #[error("{branch} fetch finished without a result")]
    Incomplete {
        /// The fetch whose result is missing.
        branch: Branch,
    },
}

impl AggregateError {
    /// The fetch that produced this error.
    #[must_use]
    pub const fn branch(&self) -> Branch {
        match self {
            Self::Upstream { branch, .. }
            | Self::DeadlineExceeded { branch }
            | Self::Cancelled { branch }
            | Self::Incomplete { branch } => *branch,
            Self::ProfileNotFound(_) => Branch::Profile,
        }
    }
}
