//! # Entities
//!
//! The users and events whose positions the store tracks.
//!
//! These live outside the store. They reference each other by plain `Id`
//! values, never by ownership, and nothing here resolves those references.
//! The store only ever sees the identity embedded in a `TrackedObject`.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::random::{random_str, random_tag};
use super::{GeoPoint, Id, ObjectKind, TrackedObject};

/// A person that can be placed on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub email: String,
    /// Events this user takes part in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Id>,
}

impl User {
    /// Synthesize a user with a random name, email and one sample tag
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: Id::with_random(rng.gen()),
            name: format!("jhon {}", random_str(rng, 4)),
            text: format!("descr: {}", random_str(rng, 10)),
            tags: vec![random_tag(rng).to_string()],
            email: format!(
                "{}@{}.{}",
                random_str(rng, 6),
                random_str(rng, 4),
                random_str(rng, 2)
            ),
            events: Vec::new(),
        }
    }

    /// Location record for this user at `location`
    pub fn locate(&self, token: impl Into<String>, location: GeoPoint) -> TrackedObject {
        TrackedObject::new(self.id, token, ObjectKind::User, location)
            .with_tags(self.tags.iter().cloned())
    }
}

/// Something happening at a place and time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<DateTime<Utc>>,
    /// Users attending this event
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Event {
    /// Synthesize an event stamped up to 100 hours in the past
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = Id::with_random(rng.gen());
        Self {
            id,
            name: format!("event: {}", id),
            text: format!("descr: {}", random_str(rng, 10)),
            tags: vec![random_tag(rng).to_string()],
            ttl: None,
            users: Vec::new(),
            timestamp: Some(Utc::now() - Duration::hours(rng.gen_range(0..100))),
        }
    }

    /// Location record for this event at `location`
    ///
    /// Carries the event's tags and timestamp so time-window queries see it.
    pub fn locate(&self, token: impl Into<String>, location: GeoPoint) -> TrackedObject {
        let record = TrackedObject::new(self.id, token, ObjectKind::Event, location)
            .with_tags(self.tags.iter().cloned());
        match self.timestamp {
            Some(ts) => record.with_timestamp(ts),
            None => record,
        }
    }
}
