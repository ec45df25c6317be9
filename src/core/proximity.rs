//! # Proximity
//!
//! How far apart are two points?
//!
//! The store measures distance on the flat longitude/latitude plane. This
//! is a planar approximation, not a great-circle metric, and the query
//! scope is expressed in the same coordinate units.

use super::GeoPoint;

/// Trait for measuring distance between points
///
/// Lower values mean closer. Implementations must be symmetric and return
/// zero for identical points.
pub trait Proximity: Send + Sync {
    /// Compute the distance between two points
    fn proximity(&self, a: &GeoPoint, b: &GeoPoint) -> f64;

    /// Name of this proximity function (for debugging/config)
    fn name(&self) -> &'static str;
}

/// Planar Euclidean distance over `(lng, lat)`
///
/// `sqrt((a.lng - b.lng)^2 + (a.lat - b.lat)^2)`
#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

impl Proximity for Euclidean {
    fn proximity(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        distance(a, b)
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

/// Planar Euclidean distance between two points
///
/// # Example
/// ```
/// use geotrack::{distance, GeoPoint};
/// let a = GeoPoint::new(0.0, 0.0).unwrap();
/// let b = GeoPoint::new(3.0, 4.0).unwrap();
/// assert_eq!(distance(&a, &b), 5.0);
/// ```
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    ((a.lng() - b.lng()).powi(2) + (a.lat() - b.lat()).powi(2)).sqrt()
}
