//! Cancellable, deadline-bearing execution scopes.
//!
//! A [`Scope`] is passed by reference into every call that may suspend. Scopes
//! form a tree: cancelling a scope cancels everything derived from it, never
//! its parent. Deadlines only ever tighten as scopes are derived.

use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::ScopeError;

/// A cancellable execution context with an optional deadline.
///
/// Cloning a scope yields a handle to the same scope, not a new child.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Scope {
    /// A scope that is never done until explicitly cancelled.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Cancels this scope and every scope derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The instant at which this scope expires, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline. `Some(Duration::ZERO)` once it has
    /// passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Reports why the scope is done, or `None` while it is still live.
    ///
    /// An elapsed deadline takes precedence over cancellation.
    #[must_use]
    pub fn err(&self) -> Option<ScopeError> {
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            Some(ScopeError::DeadlineExceeded)
        } else if self.token.is_cancelled() {
            Some(ScopeError::Cancelled)
        } else {
            None
        }
    }

    /// Returns `true` once the scope is cancelled or expired.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves when the scope is cancelled or its deadline elapses.
    pub async fn done(&self) -> ScopeError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = sleep_until(deadline) => ScopeError::DeadlineExceeded,
                () = self.token.cancelled() => self.err().unwrap_or(ScopeError::Cancelled),
            },
            None => {
                self.token.cancelled().await;
                ScopeError::Cancelled
            }
        }
    }

    /// Drives `fut` until it completes or the scope is done, whichever comes
    /// first. A scope that is already done never polls `fut`.
    ///
    /// # Errors
    ///
    /// Returns the scope's [`ScopeError`], converted into `E`, when the scope
    /// finishes first. Otherwise returns whatever `fut` returned.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<ScopeError>,
    {
        if let Some(err) = self.err() {
            return Err(err.into());
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err.into()),
            result = fut => result,
        }
    }
}

/// A child scope that is released when dropped.
///
/// Dereferences to the child [`Scope`]. Releasing cancels the child (and
/// anything derived from it) and detaches it from the parent's cancellation
/// tree, so no propagation machinery outlives the caller.
#[derive(Debug)]
pub struct DerivedScope {
    scope: Scope,
    own_deadline: Option<Instant>,
    _release: DropGuard,
}

impl DerivedScope {
    /// The child scope.
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns `true` when the timeout this scope was derived with has
    /// elapsed. Always `false` for scopes derived without a timeout.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.own_deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns `true` when this scope's deadline is the one it was derived
    /// with rather than one inherited from the parent. Ties count as its own.
    #[must_use]
    pub fn deadline_is_own(&self) -> bool {
        self.own_deadline.is_some() && self.own_deadline == self.scope.deadline
    }

    /// Releases the scope now rather than at the end of the enclosing block.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for DerivedScope {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &self.scope
    }
}

/// Derives a child of `parent`.
///
/// With a positive `timeout` the child expires at
/// `min(parent deadline, now + timeout)`. A zero or absent timeout adds no
/// deadline of its own. In both cases cancelling `parent` cancels the child,
/// while cancelling the child leaves `parent` untouched.
#[must_use]
pub fn derive_scope(parent: &Scope, timeout: Option<Duration>) -> DerivedScope {
    let own_deadline = timeout
        .filter(|timeout| !timeout.is_zero())
        .and_then(|timeout| Instant::now().checked_add(timeout));
    let deadline = match (parent.deadline, own_deadline) {
        (Some(inherited), Some(own)) => Some(inherited.min(own)),
        (inherited, own) => inherited.or(own),
    };

    let token = parent.token.child_token();
    let release = token.clone().drop_guard();

    DerivedScope {
        scope: Scope { token, deadline },
        own_deadline,
        _release: release,
    }
}
