//! Shared test mocks and utilities for useragg.

mod fixtures;
mod logs;
mod lookup;

pub use fixtures::{basic_profiles, orders};
pub use logs::CapturedLogs;
pub use lookup::{SimulatedOrderLookup, SimulatedProfileLookup};
