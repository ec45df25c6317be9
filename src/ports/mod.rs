//! # Ports
//!
//! Trait definitions for adapters. Contracts only, no implementations.
//!
//! This is the hexagonal architecture boundary:
//! - Ports define WHAT operations are needed
//! - Adapters define HOW they're implemented
//!
//! The CORE doesn't know about adapters.
//! Adapters implement these port traits.

mod track;
mod near;

// Re-export traits
pub use track::Track;
pub use near::Resolve;

// Re-export types from track
pub use track::{TrackError, TrackResult};

// Re-export types from near
pub use near::{validate_query, NearError, NearResult, SearchResult};
