//! Joins a fetched profile with the user's orders.

use useragg_core::model::{AggregatedProfile, Order, Profile};

/// Pairs `profile`'s name with the cost of every order it owns, preserving
/// the order sequence.
///
/// Orders owned by anyone else are skipped even though the order source is
/// expected to have scoped them already. No matches yields an empty vector.
#[must_use]
pub fn combine(profile: &Profile, orders: &[Order]) -> Vec<AggregatedProfile> {
    orders
        .iter()
        .filter(|order| order.user_id == profile.id)
        .map(|order| AggregatedProfile {
            name: profile.name.clone(),
            cost: order.cost,
        })
        .collect()
}
