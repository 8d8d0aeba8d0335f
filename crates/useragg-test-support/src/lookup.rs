//! Simulated upstreams — `ProfileLookup` and `OrderLookup` implementations
//! with configurable latency and failure.
//!
//! Both wait for their latency or for the scope to finish, whichever comes
//! first, and count how often they were called.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use useragg_core::error::LookupError;
use useragg_core::lookup::{OrderLookup, ProfileLookup};
use useragg_core::model::{Order, Profile, UserId};
use useragg_core::scope::Scope;

/// Waits out `latency` unless `scope` finishes first.
async fn simulate_latency(scope: &Scope, latency: Duration) -> Result<(), LookupError> {
    tokio::select! {
        () = sleep(latency) => Ok(()),
        reason = scope.done() => Err(reason.into()),
    }
}

/// A profile source that answers from a fixed list after a delay.
#[derive(Debug)]
pub struct SimulatedProfileLookup {
    latency: Duration,
    fail: bool,
    profiles: Vec<Profile>,
    calls: AtomicUsize,
}

impl SimulatedProfileLookup {
    /// Answers from `profiles` after `latency`.
    #[must_use]
    pub fn new(latency: Duration, profiles: Vec<Profile>) -> Self {
        Self {
            latency,
            fail: false,
            profiles,
            calls: AtomicUsize::new(0),
        }
    }

    /// Reports an upstream error after `latency`.
    #[must_use]
    pub fn failing(latency: Duration) -> Self {
        Self {
            fail: true,
            ..Self::new(latency, Vec::new())
        }
    }

    /// Number of `fetch` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileLookup for SimulatedProfileLookup {
    async fn fetch(&self, scope: &Scope, id: UserId) -> Result<Option<Profile>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_latency(scope, self.latency).await?;
        if self.fail {
            return Err(LookupError::Unavailable(
                "simulated profile search error".into(),
            ));
        }
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }
}

/// An order source that answers from a fixed list after a delay.
///
/// Scopes results to the requested user unless built with
/// [`SimulatedOrderLookup::unscoped`], which returns every order and lets
/// tests exercise the aggregator's own filtering.
#[derive(Debug)]
pub struct SimulatedOrderLookup {
    latency: Duration,
    fail: bool,
    scoped: bool,
    orders: Vec<Order>,
    calls: AtomicUsize,
}

impl SimulatedOrderLookup {
    /// Answers with the requested user's orders after `latency`.
    #[must_use]
    pub fn new(latency: Duration, orders: Vec<Order>) -> Self {
        Self {
            latency,
            fail: false,
            scoped: true,
            orders,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers with all of `orders`, regardless of owner, after `latency`.
    #[must_use]
    pub fn unscoped(latency: Duration, orders: Vec<Order>) -> Self {
        Self {
            scoped: false,
            ..Self::new(latency, orders)
        }
    }

    /// Reports an upstream error after `latency`.
    #[must_use]
    pub fn failing(latency: Duration) -> Self {
        Self {
            fail: true,
            ..Self::new(latency, Vec::new())
        }
    }

    /// Number of `fetch_all` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderLookup for SimulatedOrderLookup {
    async fn fetch_all(&self, scope: &Scope, user_id: UserId) -> Result<Vec<Order>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_latency(scope, self.latency).await?;
        if self.fail {
            return Err(LookupError::Unavailable(
                "simulated orders search error".into(),
            ));
        }
        Ok(self
            .orders
            .iter()
            .filter(|order| !self.scoped || order.user_id == user_id)
            .cloned()
            .collect())
    }
}
