//! # Resolver Adapters
//!
//! Implementations of the Resolve port.
//!
//! Available adapters:
//! - `FlatResolver` - Brute force scan of a snapshot (exact)

mod flat;

pub use flat::FlatResolver;
