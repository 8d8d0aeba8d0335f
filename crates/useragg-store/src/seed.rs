//! Seed data for the in-memory sources.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use useragg_core::model::{Order, Profile};

use crate::error::StoreError;

/// Profiles and orders to serve, as read from a JSON document:
///
/// ```json
/// {
///   "profiles": [{ "id": 1, "name": "Alice" }],
///   "orders": [{ "id": 1, "user_id": 1, "cost": 100.0 }]
/// }
/// ```
///
/// Either list may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// Profiles, unique by id.
    #[serde(default)]
    pub profiles: Vec<Profile>,
    /// Orders, in the sequence the order source returns them.
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Seed {
    /// Parses and validates a JSON seed document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` for malformed JSON and
    /// `StoreError::Validation` if the data breaks a model invariant.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let seed: Self = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Reads, parses and validates a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read, otherwise as
    /// [`Seed::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that profile ids are unique and every cost is a finite,
    /// non-negative number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` describing the first violation.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if !seen.insert(profile.id) {
                return Err(StoreError::Validation(format!(
                    "duplicate profile id {}",
                    profile.id
                )));
            }
        }

        for order in &self.orders {
            if !order.cost.is_finite() || order.cost < 0.0 {
                return Err(StoreError::Validation(format!(
                    "order {} has invalid cost {}",
                    order.id, order.cost
                )));
            }
        }

        Ok(())
    }
}
