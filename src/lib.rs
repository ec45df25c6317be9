//! # GeoTrack - Concurrent Geolocation State Store
//!
//! > "Where is everyone, right now?"
//!
//! GeoTrack keeps the current position of every tracked user and event in
//! memory, safe for many simultaneous readers and writers, and answers
//! proximity queries filtered by tags, time window and object kind.
//!
//! ## Philosophy
//!
//! - **Identity is the key** - One record per object, last writer wins
//! - **Copies out, never references** - Readers cannot touch stored state
//! - **Validate first, lock second** - Bad input never half-mutates the store
//! - **Pure core, swappable adapters** - Hexagonal architecture
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GEOTRACK                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CORE (pure data, no locking)                                │
//! │    GeoPoint, Id, TrackedObject, Proximity, NearQuery         │
//! │                                                              │
//! │  PORTS (trait contracts)                                     │
//! │    Track, Resolve                                            │
//! │                                                              │
//! │  ADAPTERS (swappable implementations)                        │
//! │    Storage: MemoryStore, ShardedStore                        │
//! │    Resolver: FlatResolver                                    │
//! │    Transfer: JSON import/export                              │
//! │                                                              │
//! │  ENGINE (orchestration)                                      │
//! │    GeoState - the main entry point                           │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use geotrack::{GeoConfig, GeoPoint, GeoState, InsertRequest, NearQuery, ObjectKind};
//!
//! let state = GeoState::new(GeoConfig::default());
//!
//! // Track an object
//! let id = state
//!     .insert(InsertRequest::new("aBcDeFgH", ObjectKind::User, 3.0, 4.0))
//!     .unwrap();
//!
//! // Find it again by proximity
//! let near = state
//!     .find_near(&NearQuery::new(GeoPoint::origin(), 5.0))
//!     .unwrap();
//! assert_eq!(near[0].record.id, id);
//! assert_eq!(near[0].distance, 5.0);
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Core domain - pure data and math
/// Contains: GeoPoint, Id, TrackedObject, Proximity, NearQuery, GeoConfig
pub mod core;

/// Port definitions - trait contracts for adapters
/// Contains: Track trait, Resolve trait
pub mod ports;

/// Adapter implementations - swappable components
/// Contains: storage, index, json submodules
pub mod adapters;

/// Engine - orchestration layer
/// Contains: GeoState main struct
pub mod engine;

// ============================================================================
// RE-EXPORTS (public API)
// ============================================================================

// Core types
pub use crate::core::{
    GeoPoint, Id, InsertRequest, NearQuery, ObjectKind, PointError, TimeWindow, TrackedObject,
};
pub use crate::core::config::GeoConfig;
pub use crate::core::entity::{Event, User};
pub use crate::core::proximity::{distance, Euclidean, Proximity};

// Port traits
pub use crate::ports::{NearError, Resolve, SearchResult, Track, TrackError};

// Adapters
pub use crate::adapters::index::FlatResolver;
pub use crate::adapters::storage::{MemoryStore, ShardedStore};

// Engine
pub use crate::engine::GeoState;
