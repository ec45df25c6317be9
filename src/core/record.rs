//! # Tracked Object Record
//!
//! One location entry for a user or an event.
//!
//! ```text
//! TrackedObject
//! ├── id: Id            (identity, never reassigned)
//! ├── token: String     (short opaque label, not unique)
//! ├── kind: ObjectKind  (User | Event)
//! ├── location: GeoPoint
//! ├── tags: Vec<String> (set-like, may be empty)
//! └── timestamp: Option<DateTime<Utc>>
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::{GeoPoint, Id};

/// Which higher-level entity a location belongs to
///
/// Serialized as `"User"` / `"Event"`; parsed in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectKind {
    User,
    Event,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::User => "User",
            ObjectKind::Event => "Event",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an object kind string that is neither "user" nor "event"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown object kind {0:?}")]
pub struct ObjectKindParseError(pub String);

impl FromStr for ObjectKind {
    type Err = ObjectKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ObjectKind::User),
            "event" => Ok(ObjectKind::Event),
            _ => Err(ObjectKindParseError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ObjectKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A stored location entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    #[serde(rename = "_id")]
    pub id: Id,

    #[serde(default)]
    pub token: String,

    #[serde(rename = "tobject")]
    pub kind: ObjectKind,

    pub location: GeoPoint,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_tags"
    )]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackedObject {
    /// Create a record with no tags and no timestamp
    pub fn new(id: Id, token: impl Into<String>, kind: ObjectKind, location: GeoPoint) -> Self {
        Self {
            id,
            token: token.into(),
            kind,
            location,
            tags: Vec::new(),
            timestamp: None,
        }
    }

    /// Attach tags; repeated labels keep their first position only
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(tags);
        self
    }

    /// Attach a timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// True if any of `wanted` is among this record's tags
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        wanted.iter().any(|w| self.tags.contains(w))
    }
}

pub(crate) fn dedup_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Tag list from the wire, with repeats dropped
pub(crate) fn deserialize_tags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(dedup_tags(Vec::<String>::deserialize(deserializer)?))
}
