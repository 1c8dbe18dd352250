//! Geographic primitives: point-to-point distance and a local planar frame.
//!
//! Distances between fixes go through the `geo` crate (haversine by default,
//! ellipsoidal geodesic on request). Triangle geometry for curvature uses a
//! short-range equirectangular projection, which is accurate to well under a
//! metre across the few hundred metres spanned by consecutive log points.

use geo::{Distance, Geodesic, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::GpsPoint;

/// Mean Earth radius in metres (IUGG), same value `geo` uses for haversine.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Which distance formula to use between consecutive fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum DistanceModel {
    /// Great-circle distance on a sphere.
    #[default]
    Haversine,
    /// Geodesic distance on the WGS84 ellipsoid (Karney).
    Geodesic,
}

impl DistanceModel {
    /// Distance in metres between two points under this model.
    pub fn distance(&self, p1: &GpsPoint, p2: &GpsPoint) -> f64 {
        match self {
            DistanceModel::Haversine => haversine_distance(p1, p2),
            DistanceModel::Geodesic => geodesic_distance(p1, p2),
        }
    }
}

/// Great-circle distance in metres.
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Ellipsoidal (WGS84) geodesic distance in metres.
pub fn geodesic_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Geodesic::distance(point1, point2)
}

/// Equirectangular projection around a local origin.
///
/// `x` grows east, `y` grows north, both in metres. Longitude is scaled by
/// the cosine of a reference latitude, so the frame is only meaningful for
/// spans up to roughly a kilometre.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: GpsPoint,
    cos_ref_lat: f64,
}

impl LocalProjection {
    /// Frame centred on `origin` using `ref_latitude` for the longitude scale.
    pub fn new(origin: GpsPoint, ref_latitude: f64) -> Self {
        Self {
            origin,
            cos_ref_lat: ref_latitude.to_radians().cos(),
        }
    }

    /// Frame for a triangle: origin at the first vertex, scale at the mean latitude.
    pub fn for_triangle(p1: &GpsPoint, p2: &GpsPoint, p3: &GpsPoint) -> Self {
        let mean_lat = (p1.latitude + p2.latitude + p3.latitude) / 3.0;
        Self::new(*p1, mean_lat)
    }

    /// Project a point into the local frame, returning `(x, y)` in metres.
    pub fn project(&self, p: &GpsPoint) -> (f64, f64) {
        let x = (p.longitude - self.origin.longitude).to_radians() * self.cos_ref_lat * EARTH_RADIUS_M;
        let y = (p.latitude - self.origin.latitude).to_radians() * EARTH_RADIUS_M;
        (x, y)
    }

    /// Inverse of [`project`](Self::project).
    pub fn unproject(&self, x: f64, y: f64) -> GpsPoint {
        let lat = self.origin.latitude + (y / EARTH_RADIUS_M).to_degrees();
        let lng = self.origin.longitude + (x / (EARTH_RADIUS_M * self.cos_ref_lat)).to_degrees();
        GpsPoint::new(lat, lng)
    }
}

/// Move a point by `north_m` / `east_m` metres (short range only).
pub fn offset_meters(point: &GpsPoint, north_m: f64, east_m: f64) -> GpsPoint {
    LocalProjection::new(*point, point.latitude).unproject(east_m, north_m)
}
