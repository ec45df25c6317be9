//! # Insert Request
//!
//! What a transport layer hands the store to create or move an object.
//! Field names follow the form/JSON names clients already send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GeoPoint, Id, ObjectKind, PointResult, TrackedObject};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertRequest {
    /// Existing identity to replace; a fresh one is minted when absent
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,

    #[serde(default)]
    pub token: String,

    #[serde(rename = "tobject")]
    pub kind: ObjectKind,

    pub lng: f64,
    pub lat: f64,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl InsertRequest {
    pub fn new(token: impl Into<String>, kind: ObjectKind, lng: f64, lat: f64) -> Self {
        Self {
            id: None,
            token: token.into(),
            kind,
            lng,
            lat,
            tags: Vec::new(),
            timestamp: None,
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Validate the coordinates and build the record under `id`
    pub fn into_record(self, id: Id) -> PointResult<TrackedObject> {
        let location = GeoPoint::new(self.lng, self.lat)?;
        let record = TrackedObject::new(id, self.token, self.kind, location).with_tags(self.tags);
        Ok(match self.timestamp {
            Some(ts) => record.with_timestamp(ts),
            None => record,
        })
    }
}
