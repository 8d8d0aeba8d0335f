//! Fixture data shared across test suites.

use useragg_core::model::{Order, Profile};

/// Five profiles with ids 1 through 5: Alice, Bob, Charlie, Dave, Eva.
#[must_use]
pub fn basic_profiles() -> Vec<Profile> {
    vec![
        Profile::new(1, "Alice"),
        Profile::new(2, "Bob"),
        Profile::new(3, "Charlie"),
        Profile::new(4, "Dave"),
        Profile::new(5, "Eva"),
    ]
}

/// Builds orders from `(order id, owner id, cost)` triples.
#[must_use]
pub fn orders(rows: &[(i64, i64, f64)]) -> Vec<Order> {
    rows.iter()
        .map(|&(id, user_id, cost)| Order::new(id, user_id, cost))
        .collect()
}
