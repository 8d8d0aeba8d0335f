//! useragg core — shared data model, upstream contracts and concurrency
//! primitives.
//!
//! This crate defines the types every other crate depends on: the profile and
//! order model, the lookup traits upstream sources implement, the cancellable
//! execution [`scope::Scope`], and the [`join::JoinBarrier`] used to fan out
//! work under a shared scope. It contains no infrastructure code.

pub mod error;
pub mod join;
pub mod lookup;
pub mod model;
pub mod scope;
