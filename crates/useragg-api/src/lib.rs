//! useragg HTTP API — configuration, state, routes and error mapping.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
