//! # Flat Resolver Adapter
//!
//! Brute force query resolution.
//! Measures the center against ALL records in the snapshot - O(n) per query.
//!
//! Good for:
//! - Exact results
//! - Stores that change faster than an index could be rebuilt
//!
//! Not good for:
//! - Very large stores queried at a high rate

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::trace;

use crate::core::config::sanitize_epsilon;
use crate::core::proximity::{Euclidean, Proximity};
use crate::core::{GeoPoint, NearQuery, TrackedObject};
use crate::ports::{validate_query, NearResult, Resolve, SearchResult};

/// Brute force resolver - filters every record
pub struct FlatResolver {
    /// Proximity function to use
    proximity: Arc<dyn Proximity>,

    /// Slack added to the scope
    epsilon: f64,
}

impl FlatResolver {
    /// Create with a proximity function and a scope tolerance
    ///
    /// A record matches when its distance is at most `scope + epsilon`.
    /// Negative or non-finite `epsilon` is treated as `0.0`.
    pub fn new(proximity: Arc<dyn Proximity>, epsilon: f64) -> Self {
        Self {
            proximity,
            epsilon: sanitize_epsilon(epsilon),
        }
    }

    /// Create with euclidean distance and an exact scope
    pub fn euclidean() -> Self {
        Self::new(Arc::new(Euclidean), 0.0)
    }

    /// True if the record passes every non-distance filter
    fn passes_filters(record: &TrackedObject, query: &NearQuery) -> bool {
        if !query.tags.is_empty() && !record.has_any_tag(&query.tags) {
            return false;
        }

        if let Some(window) = &query.window {
            match record.timestamp {
                Some(ts) if window.contains(ts) => {}
                _ => return false,
            }
        }

        if let Some(kind) = query.kind {
            if record.kind != kind {
                return false;
            }
        }

        true
    }
}

impl Resolve for FlatResolver {
    fn resolve(
        &self,
        records: &[TrackedObject],
        query: &NearQuery,
    ) -> NearResult<Vec<SearchResult>> {
        validate_query(query)?;

        let bound = query.scope + self.epsilon;

        let mut results: Vec<SearchResult> = records
            .iter()
            .filter(|record| Self::passes_filters(record, query))
            .filter_map(|record| {
                let distance = self.proximity.proximity(&record.location, &query.center);
                (distance <= bound).then(|| SearchResult::new(record.clone(), distance))
            })
            .collect();

        // Nearest first, ties by id
        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        trace!(
            scanned = records.len(),
            matched = results.len(),
            scope = query.scope,
            "query resolved"
        );

        Ok(results)
    }

    fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        self.proximity.proximity(a, b)
    }

    fn name(&self) -> &'static str {
        "flat"
    }
}
