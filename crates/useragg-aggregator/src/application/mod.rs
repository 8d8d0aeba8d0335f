//! Application layer: configuration and the aggregation use case.

pub mod aggregator;
pub mod config;
