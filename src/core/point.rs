//! # GeoPoint
//!
//! A coordinate pair with a geometry discriminator. The fundamental primitive.
//!
//! Coordinates are stored as `(longitude, latitude)`, the GeoJSON order.
//! A `GeoPoint` can only be built through a validating constructor, so any
//! value you hold is inside the valid domain:
//!
//! - longitude in `[-180, 180]`
//! - latitude in `[-90, 90]`

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geometry discriminator for every point this crate produces
pub const POINT_TYPE: &str = "Point";

/// Valid longitude range, inclusive
pub const LNG_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Valid latitude range, inclusive
pub const LAT_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// Result type for point construction
pub type PointResult<T> = Result<T, PointError>;

/// Errors raised when a coordinate pair is outside the valid domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    /// Longitude is NaN, infinite, or outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Latitude is NaN, infinite, or outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Geometry type other than "Point"
    #[error("unsupported geometry type {0:?}")]
    UnsupportedType(String),
}

/// A point on the longitude/latitude plane
///
/// Immutable: replace the whole point to move an object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint", into = "RawGeoPoint")]
pub struct GeoPoint {
    lng: f64,
    lat: f64,
}

impl GeoPoint {
    /// Create a point, rejecting out-of-range or non-finite coordinates
    ///
    /// # Example
    /// ```
    /// use geotrack::GeoPoint;
    /// let p = GeoPoint::new(30.5, 50.4).unwrap();
    /// assert_eq!(p.coordinates(), [30.5, 50.4]);
    /// assert!(GeoPoint::new(181.0, 0.0).is_err());
    /// ```
    pub fn new(lng: f64, lat: f64) -> PointResult<Self> {
        // NaN is never contained, so it is rejected here too
        if !LNG_RANGE.contains(&lng) {
            return Err(PointError::LongitudeOutOfRange(lng));
        }
        if !LAT_RANGE.contains(&lat) {
            return Err(PointError::LatitudeOutOfRange(lat));
        }
        Ok(Self { lng, lat })
    }

    /// The point at longitude 0, latitude 0
    pub fn origin() -> Self {
        Self { lng: 0.0, lat: 0.0 }
    }

    /// Geometry type, always "Point"
    pub fn kind(&self) -> &'static str {
        POINT_TYPE
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Coordinates in `[lng, lat]` order
    pub fn coordinates(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Wire shape: `{"type": "Point", "coordinates": [lng, lat]}`
#[derive(Serialize, Deserialize)]
struct RawGeoPoint {
    #[serde(rename = "type", default = "default_type")]
    kind: String,
    coordinates: [f64; 2],
}

fn default_type() -> String {
    POINT_TYPE.to_string()
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = PointError;

    fn try_from(raw: RawGeoPoint) -> PointResult<Self> {
        if raw.kind != POINT_TYPE {
            return Err(PointError::UnsupportedType(raw.kind));
        }
        GeoPoint::new(raw.coordinates[0], raw.coordinates[1])
    }
}

impl From<GeoPoint> for RawGeoPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: POINT_TYPE.to_string(),
            coordinates: point.coordinates(),
        }
    }
}
