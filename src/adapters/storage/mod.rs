//! # Storage Adapters
//!
//! Implementations of the Track port.
//!
//! Available adapters:
//! - `MemoryStore` - One HashMap behind one RwLock (default)
//! - `ShardedStore` - N HashMaps, each behind its own RwLock

mod memory;
mod sharded;

pub use memory::MemoryStore;
pub use sharded::ShardedStore;
