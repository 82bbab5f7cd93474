//! Crate-level scenario tests.
//!
//! - `integration.rs`: end-to-end fights through roster, resolver and sinks
//! - `concurrency.rs`: several resolvers and workers racing on one roster
//! - `determinism.rs`: seeded runs reproduce exactly
//! - `helpers.rs`: roster setup and inspection utilities

mod helpers;
mod integration;

// Re-export for convenience
pub use helpers::*;
