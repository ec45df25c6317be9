//! # Configuration
//!
//! Store configuration - define how the store behaves.
//!
//! Everything is configurable, not hardcoded:
//! - Proximity function
//! - Scope tolerance
//! - Lock layout (one lock or sharded)
//! - Bounded lock waits
//! - Synthetic token length

use std::sync::Arc;
use std::time::Duration;

use super::proximity::{Euclidean, Proximity};

/// Main store configuration
#[derive(Clone)]
pub struct GeoConfig {
    /// Distance function used by queries
    pub proximity: Arc<dyn Proximity>,

    /// Slack added to the scope when deciding membership
    ///
    /// `0.0` admits only distances `<= scope`. Raise it to let
    /// floating-point near misses through. Negative or non-finite values
    /// are treated as `0.0` when the resolver is built.
    pub scope_epsilon: f64,

    /// Number of lock shards
    ///
    /// `1` keeps the whole map behind one lock; more shards spread writer
    /// contention across ids at the cost of whole-store operations taking
    /// every shard lock.
    pub shards: usize,

    /// Longest a store operation waits for its lock
    ///
    /// `None` blocks until the lock is free.
    pub lock_timeout: Option<Duration>,

    /// Length of generated tokens
    pub token_len: usize,
}

impl GeoConfig {
    /// Default configuration: euclidean proximity, exact scope, one lock
    pub fn new() -> Self {
        Self {
            proximity: Arc::new(Euclidean),
            scope_epsilon: 0.0,
            shards: 1,
            lock_timeout: None,
            token_len: 8,
        }
    }

    /// Set a custom proximity function
    pub fn with_proximity<P: Proximity + 'static>(mut self, proximity: P) -> Self {
        self.proximity = Arc::new(proximity);
        self
    }

    /// Set the scope tolerance; negative or non-finite values become `0.0`
    pub fn with_scope_epsilon(mut self, epsilon: f64) -> Self {
        self.scope_epsilon = sanitize_epsilon(epsilon);
        self
    }

    /// Set the shard count; `0` is treated as `1`
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards.max(1);
        self
    }

    /// Bound every lock wait
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    pub fn with_token_len(mut self, len: usize) -> Self {
        self.token_len = len;
        self
    }
}

/// Clamp a scope tolerance to a finite, non-negative value
pub(crate) fn sanitize_epsilon(epsilon: f64) -> f64 {
    if epsilon.is_finite() && epsilon > 0.0 {
        epsilon
    } else {
        0.0
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GeoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoConfig")
            .field("proximity", &self.proximity.name())
            .field("scope_epsilon", &self.scope_epsilon)
            .field("shards", &self.shards)
            .field("lock_timeout", &self.lock_timeout)
            .field("token_len", &self.token_len)
            .finish()
    }
}
