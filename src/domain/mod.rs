//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `breeding` - Breeding cycle aggregate, status machine and validation rules
//! - `analysis` - Pure domain services for scoring, alerts and economics

pub mod analysis;
pub mod breeding;
pub mod foundation;
