//! # Near Query
//!
//! The shape of a proximity search: a center, a scope, and optional
//! tag, time-window, object-kind and limit filters.
//!
//! Filters combine with AND. Inside the tag filter, tags combine with OR:
//! a record passes if it carries at least one requested tag.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::record::{dedup_tags, deserialize_tags};
use super::{GeoPoint, ObjectKind};

/// Closed time interval `[start, end]` in UTC
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window; `start > end` is caught when the query runs
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window covering the last `span` up to now
    pub fn last(span: Duration) -> Self {
        let end = Utc::now();
        Self {
            start: end - span,
            end,
        }
    }

    /// True if `start <= end`
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Inclusive containment check
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// A proximity search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearQuery {
    pub center: GeoPoint,

    /// Radius in coordinate units
    pub scope: f64,

    /// Match records carrying any of these tags; empty means no tag filter
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_tags"
    )]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,

    #[serde(default, rename = "tobject", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,

    /// Keep at most this many nearest matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl NearQuery {
    /// Everything within `scope` of `center`
    pub fn new(center: GeoPoint, scope: f64) -> Self {
        Self {
            center,
            scope,
            tags: Vec::new(),
            window: None,
            kind: None,
            limit: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(tags);
        self
    }

    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_inclusive() {
        let start = Utc::now();
        let end = start + Duration::hours(1);
        let window = TimeWindow::new(start, end);

        assert!(window.contains(start));
        assert!(window.contains(end));
        assert!(!window.contains(end + Duration::milliseconds(1)));
        assert!(!window.contains(start - Duration::milliseconds(1)));
    }

    #[test]
    fn test_window_validity() {
        let now = Utc::now();
        assert!(TimeWindow::new(now, now).is_valid());
        assert!(!TimeWindow::new(now, now - Duration::seconds(1)).is_valid());
    }

    #[test]
    fn test_window_last() {
        let window = TimeWindow::last(Duration::hours(2));
        assert!(window.is_valid());
        assert_eq!(window.end - window.start, Duration::hours(2));
    }

    #[test]
    fn test_query_builder() {
        let query = NearQuery::new(GeoPoint::origin(), 1.5)
            .with_tags(["drugs", "drugs", "debauch"])
            .with_kind(ObjectKind::Event)
            .with_limit(3);

        assert_eq!(query.scope, 1.5);
        assert_eq!(query.tags, vec!["drugs", "debauch"]);
        assert_eq!(query.kind, Some(ObjectKind::Event));
        assert_eq!(query.limit, Some(3));
        assert!(query.window.is_none());
    }

    #[test]
    fn test_query_from_json() {
        let query: NearQuery = serde_json::from_str(
            r#"{"center":{"type":"Point","coordinates":[1.0,2.0]},"scope":0.5,"tobject":"User"}"#,
        )
        .unwrap();
        assert_eq!(query.center.coordinates(), [1.0, 2.0]);
        assert_eq!(query.kind, Some(ObjectKind::User));
        assert!(query.tags.is_empty());
    }
}
