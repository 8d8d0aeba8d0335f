//! In-memory profile and order sources.
//!
//! Implements the upstream lookup traits over data loaded from a JSON seed,
//! optionally delaying every answer to mimic a remote service.

pub mod error;
pub mod memory;
pub mod seed;
