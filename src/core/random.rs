//! # Random Generation
//!
//! Synthetic tokens, points and records for seeding and load tests.
//!
//! Every helper takes the RNG as a parameter so callers can pass a seeded
//! `StdRng` and get reproducible data.

use chrono::{Duration, Utc};
use rand::Rng;

use super::point::{LAT_RANGE, LNG_RANGE};
use super::{GeoPoint, Id, ObjectKind, TrackedObject};

/// Alphabet used for random tokens
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Tags handed out to synthetic users, events and records
pub const SAMPLE_TAGS: [&str; 3] = ["whoredom", "debauch", "drugs"];

/// How far back a synthetic event timestamp may go, in hours
pub const MAX_EVENT_AGE_HOURS: i64 = 100;

/// Random string of `len` ASCII letters
pub fn random_str<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

/// One of the sample tags
pub fn random_tag<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SAMPLE_TAGS[rng.gen_range(0..SAMPLE_TAGS.len())]
}

/// User or Event with equal probability
pub fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> ObjectKind {
    if rng.gen_bool(0.5) {
        ObjectKind::User
    } else {
        ObjectKind::Event
    }
}

/// Point drawn uniformly from the full longitude and latitude ranges
pub fn random_point<R: Rng + ?Sized>(rng: &mut R) -> GeoPoint {
    let lng = rng.gen_range(LNG_RANGE);
    let lat = rng.gen_range(LAT_RANGE);
    // gen_range over the inclusive ranges never leaves them
    GeoPoint::new(lng, lat).unwrap_or_else(|_| GeoPoint::origin())
}

/// Fully synthetic record
///
/// Event records also get a timestamp within the last
/// [`MAX_EVENT_AGE_HOURS`] hours; user records do not.
pub fn random_record<R: Rng + ?Sized>(rng: &mut R, token_len: usize) -> TrackedObject {
    let id = Id::with_random(rng.gen());
    let token = random_str(rng, token_len);
    let kind = random_kind(rng);
    let location = random_point(rng);
    let record = TrackedObject::new(id, token, kind, location).with_tags([random_tag(rng)]);

    match kind {
        ObjectKind::Event => {
            let age = Duration::hours(rng.gen_range(0..MAX_EVENT_AGE_HOURS));
            record.with_timestamp(Utc::now() - age)
        }
        ObjectKind::User => record,
    }
}
