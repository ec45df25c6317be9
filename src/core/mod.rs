//! # Core Domain
//!
//! Pure data and math, no locking. The foundation of the store.
//!
//! This module contains the fundamental types and operations:
//! - `GeoPoint` - A validated longitude/latitude pair
//! - `Id` - Identity of a tracked object
//! - `TrackedObject` - A location entry for a user or event
//! - `Proximity` - Trait for measuring distance
//! - `NearQuery` - Shape of a proximity search
//!
//! ## Design Principles
//!
//! - Values are validated at construction, never half-built
//! - No shared state, no I/O
//! - Randomness is injected, so generation is testable with a seed

mod point;
mod id;
mod record;
pub mod entity;
pub mod proximity;
pub mod random;
pub mod query;
pub mod request;
pub mod config;

// Re-exports
pub use point::{GeoPoint, PointError, PointResult, LAT_RANGE, LNG_RANGE, POINT_TYPE};
pub use id::{Id, IdParseError};
pub use record::{ObjectKind, ObjectKindParseError, TrackedObject};
pub use query::{NearQuery, TimeWindow};
pub use request::InsertRequest;
