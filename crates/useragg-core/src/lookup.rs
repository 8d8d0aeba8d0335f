//! Upstream lookup abstractions.
//!
//! The aggregator depends on these traits and never on a concrete source.
//! Implementations receive the caller's [`Scope`] and should stop work once it
//! is done, although the aggregator also races every call against the scope.

use async_trait::async_trait;

use crate::error::LookupError;
use crate::model::{Order, Profile, UserId};
use crate::scope::Scope;

/// Source of user profiles.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Fetch the profile for `id`. Returns `Ok(None)` when the source has no
    /// such profile.
    async fn fetch(&self, scope: &Scope, id: UserId) -> Result<Option<Profile>, LookupError>;
}

/// Source of orders.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    /// Fetch every order owned by `user_id`, in source order.
    async fn fetch_all(&self, scope: &Scope, user_id: UserId) -> Result<Vec<Order>, LookupError>;
}
