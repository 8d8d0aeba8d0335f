//! In-memory implementations of `ProfileLookup` and `OrderLookup`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::debug;
use useragg_core::error::LookupError;
use useragg_core::lookup::{OrderLookup, ProfileLookup};
use useragg_core::model::{Order, Profile, UserId};
use useragg_core::scope::Scope;

use crate::seed::Seed;

/// Holds the caller for `latency`, or until `scope` is done.
async fn delay(scope: &Scope, latency: Option<Duration>) -> Result<(), LookupError> {
    if let Some(err) = scope.err() {
        return Err(err.into());
    }
    let Some(latency) = latency else {
        return Ok(());
    };
    tokio::select! {
        reason = scope.done() => Err(reason.into()),
        () = sleep(latency) => Ok(()),
    }
}

/// Profiles keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: HashMap<UserId, Profile>,
    latency: Option<Duration>,
}

impl InMemoryProfileStore {
    /// Creates a store over `profiles`. Later duplicates replace earlier ones.
    #[must_use]
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.id, p)).collect(),
            latency: None,
        }
    }

    /// Delays every answer by `latency`.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..self
        }
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if the store holds no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[async_trait]
impl ProfileLookup for InMemoryProfileStore {
    async fn fetch(&self, scope: &Scope, id: UserId) -> Result<Option<Profile>, LookupError> {
        delay(scope, self.latency).await?;
        let profile = self.profiles.get(&id).cloned();
        debug!(user_id = id.0, found = profile.is_some(), "profile lookup");
        Ok(profile)
    }
}

/// Orders in insertion sequence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Vec<Order>,
    latency: Option<Duration>,
}

impl InMemoryOrderStore {
    /// Creates a store over `orders`.
    #[must_use]
    pub fn new(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
            latency: None,
        }
    }

    /// Delays every answer by `latency`.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..self
        }
    }

    /// Number of stored orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns `true` if the store holds no orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderLookup for InMemoryOrderStore {
    async fn fetch_all(&self, scope: &Scope, user_id: UserId) -> Result<Vec<Order>, LookupError> {
        delay(scope, self.latency).await?;
        let orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        debug!(user_id = user_id.0, count = orders.len(), "order lookup");
        Ok(orders)
    }
}

/// Builds both stores from a validated seed, applying the same latency to
/// each.
#[must_use]
pub fn stores_from_seed(
    seed: Seed,
    latency: Option<Duration>,
) -> (InMemoryProfileStore, InMemoryOrderStore) {
    let mut profiles = InMemoryProfileStore::new(seed.profiles);
    let mut orders = InMemoryOrderStore::new(seed.orders);
    if let Some(latency) = latency {
        profiles = profiles.with_latency(latency);
        orders = orders.with_latency(latency);
    }
    (profiles, orders)
}
