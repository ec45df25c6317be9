//! # Track Port
//!
//! Trait for holding the current location of every tracked object.
//!
//! Implemented by storage adapters (single lock, sharded).
//!
//! All methods take `&self`: implementations synchronize internally and
//! are shared between request handlers. Records go in and come out by
//! value, so callers never hold a reference into the stored map.

use std::time::Duration;

use thiserror::Error;

use crate::core::{Id, PointError, TrackedObject};

/// Result type for track operations
pub type TrackResult<T> = Result<T, TrackError>;

/// Errors that can occur during track operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    /// Coordinates outside the valid domain
    #[error("invalid point: {0}")]
    InvalidPoint(#[from] PointError),

    /// An update was requested without an identity to replace
    #[error("missing id for replacement")]
    MissingId,

    /// A bounded lock wait expired
    #[error("{operation} timed out after {timeout:?} waiting for the store lock")]
    ConcurrencyTimeout {
        operation: &'static str,
        timeout: Duration,
    },
}

/// Trait for storing tracked objects
pub trait Track: Send + Sync {
    /// Insert or fully replace the record at `record.id`
    fn add(&self, record: TrackedObject) -> TrackResult<()>;

    /// Insert every record under one exclusive acquisition
    ///
    /// Other threads see either none or all of the batch.
    /// Returns the number of records written.
    fn add_batch(&self, records: Vec<TrackedObject>) -> TrackResult<usize>;

    /// Copy of the record for `id`, `None` on a miss
    fn get(&self, id: Id) -> TrackResult<Option<TrackedObject>>;

    /// Check if a record exists
    fn contains(&self, id: Id) -> TrackResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Atomically drop every record
    fn clear(&self) -> TrackResult<()>;

    /// Number of records; always waits for the lock
    fn len(&self) -> usize;

    /// Check if the store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every record at one instant, ordered by id
    fn snapshot(&self) -> TrackResult<Vec<TrackedObject>>;

    /// Adapter name (for logs)
    fn name(&self) -> &'static str;
}
