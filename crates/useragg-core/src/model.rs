//! Profile and order data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a user, shared by profiles and the orders they own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Identity of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A user profile as returned by the profile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The user this profile describes.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl Profile {
    /// Creates a profile.
    #[must_use]
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An order as returned by the order source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// The user that owns this order.
    pub user_id: UserId,
    /// Monetary cost. Never negative.
    pub cost: f64,
}

impl Order {
    /// Creates an order.
    #[must_use]
    pub fn new(id: i64, user_id: impl Into<UserId>, cost: f64) -> Self {
        Self {
            id: OrderId(id),
            user_id: user_id.into(),
            cost,
        }
    }
}

/// One line of an aggregation response: the owner's name paired with the cost
/// of a single order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProfile {
    /// Display name of the order's owner.
    pub name: String,
    /// Cost of the order.
    pub cost: f64,
}

impl AggregatedProfile {
    /// Creates an aggregated line.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }
}
