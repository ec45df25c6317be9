//! # Near Port
//!
//! Trait for answering proximity queries over a snapshot.
//!
//! Implemented by resolver adapters (Flat).

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::{GeoPoint, NearQuery, TrackedObject};
use super::TrackError;

/// Result type for near operations
pub type NearResult<T> = Result<T, NearError>;

/// A matching record with its distance from the query center
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub record: TrackedObject,
    pub distance: f64,
}

impl SearchResult {
    pub fn new(record: TrackedObject, distance: f64) -> Self {
        Self { record, distance }
    }
}

/// Errors that can occur during near operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NearError {
    #[error("scope must not be negative, got {0}")]
    NegativeScope(f64),

    #[error("scope must be a finite number")]
    NonFiniteScope,

    #[error("time window starts at {start} after it ends at {end}")]
    InvalidTimeWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Reading the snapshot failed
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Trait for resolving a query against records
pub trait Resolve: Send + Sync {
    /// Matches ordered by ascending distance, ties by id
    ///
    /// An empty vector means nothing matched.
    fn resolve(
        &self,
        records: &[TrackedObject],
        query: &NearQuery,
    ) -> NearResult<Vec<SearchResult>>;

    /// Distance between two points as this resolver measures it
    fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64;

    /// Resolver name (for logs)
    fn name(&self) -> &'static str;
}

/// Reject a query before any lock is taken
pub fn validate_query(query: &NearQuery) -> NearResult<()> {
    if !query.scope.is_finite() {
        return Err(NearError::NonFiniteScope);
    }
    if query.scope < 0.0 {
        return Err(NearError::NegativeScope(query.scope));
    }
    if let Some(window) = query.window {
        if !window.is_valid() {
            return Err(NearError::InvalidTimeWindow {
                start: window.start,
                end: window.end,
            });
        }
    }
    Ok(())
}
