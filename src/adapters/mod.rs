//! # Adapters
//!
//! Swappable implementations of port traits.
//!
//! This is where the hexagonal architecture meets reality:
//! - Storage adapters: single-lock memory, sharded memory
//! - Resolver adapters: Flat (brute force)
//! - JSON import/export of the whole store
//!
//! Each adapter implements one or more port traits.
//! Adapters can be swapped without changing core logic.

pub mod storage;
pub mod index;
pub mod json;
