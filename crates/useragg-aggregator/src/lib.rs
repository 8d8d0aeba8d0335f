//! useragg — concurrent profile and order aggregation.
//!
//! Fetches a user's profile and orders in parallel under a bounded scope and
//! joins them into one list of `(name, cost)` lines.

pub mod application;
pub mod domain;
