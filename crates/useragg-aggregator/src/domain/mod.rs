//! Pure domain logic for aggregation.

pub mod combine;
