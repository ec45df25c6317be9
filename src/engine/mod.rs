//! # Engine
//!
//! The orchestration layer that wires everything together.
//!
//! This is where:
//! - Configuration is applied
//! - Adapters are connected to ports
//! - The unified store interface is exposed

mod geostate;

pub use geostate::GeoState;
