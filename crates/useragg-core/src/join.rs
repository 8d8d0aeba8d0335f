//! Fan-out/fan-in join barrier.
//!
//! A [`JoinBarrier`] spawns independent operations under one shared
//! [`Scope`]. The first operation to fail cancels that scope so its siblings
//! can abandon their work, yet [`JoinBarrier::wait`] only returns once every
//! operation has terminated. Operations hand results back through disjoint
//! [`Slot`]s, which are only readable after the barrier has been waited on.

use std::future::Future;
use std::panic;
use std::sync::{Arc, OnceLock};

use tokio::task::JoinSet;

use crate::scope::Scope;

/// A write-once output cell owned by a single operation.
#[derive(Debug)]
pub struct Slot<T>(Arc<OnceLock<T>>);

impl<T> Slot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(OnceLock::new()))
    }

    /// Stores `value`. Consumes the handle so an operation writes at most
    /// once.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if another handle already wrote to the slot.
    /// Release builds keep the first value and drop `value`.
    pub fn fill(self, value: T) {
        let stored = self.0.set(value).is_ok();
        debug_assert!(stored, "slot written twice");
    }

    /// Takes the stored value.
    ///
    /// Returns `None` if nothing was written, or if another handle to the slot
    /// is still alive, which cannot happen once the barrier the writing
    /// operation ran under has been waited on.
    #[must_use]
    pub fn take(self) -> Option<T> {
        Arc::into_inner(self.0).and_then(OnceLock::into_inner)
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs operations concurrently under a shared scope and joins all of them.
///
/// Dropping a barrier without waiting on it aborts its operations.
#[derive(Debug)]
pub struct JoinBarrier<E> {
    scope: Scope,
    tasks: JoinSet<Result<(), E>>,
}

impl<E: Send + 'static> JoinBarrier<E> {
    /// Creates a barrier whose operations share `scope`. A failing operation
    /// cancels `scope`, so pass a scope derived for this barrier rather than
    /// the caller's own.
    #[must_use]
    pub fn new(scope: &Scope) -> Self {
        Self {
            scope: scope.clone(),
            tasks: JoinSet::new(),
        }
    }

    /// Spawns `op` as its own task. `op` receives a handle to the shared scope
    /// and should stop work as soon as that scope is done.
    pub fn spawn<F, Fut>(&mut self, op: F)
    where
        F: FnOnce(Scope) -> Fut,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        self.tasks.spawn(op(self.scope.clone()));
    }

    /// Waits for every spawned operation to terminate.
    ///
    /// A panicking operation cancels the shared scope like a failure does, and
    /// the panic is resumed here after the remaining operations have finished.
    ///
    /// # Errors
    ///
    /// Returns the first failure observed. When several operations fail, which
    /// one is reported depends on scheduling.
    pub async fn wait(mut self) -> Result<(), E> {
        let mut first_failure = None;
        let mut panic_payload = None;

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    self.scope.cancel();
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
                Err(join_err) => {
                    self.scope.cancel();
                    if join_err.is_panic() && panic_payload.is_none() {
                        panic_payload = Some(join_err.into_panic());
                    }
                }
            }
        }

        if let Some(payload) = panic_payload {
            panic::resume_unwind(payload);
        }
        first_failure.map_or(Ok(()), Err)
    }
}
