//! Menger curvature of the path at a log point.
//!
//! Three consecutive log points P1, P2, P3 define a circle; its curvature
//! `κ = 4·area / (|P1P2|·|P2P3|·|P1P3|)` is the reciprocal of the circumscribed
//! radius. Railway alignments are usually quoted by radius, so both are
//! reported.
//!
//! Reading the percent value (`κ × 100`):
//!
//! | percent | radius |
//! |---|---|
//! | 0 % | straight |
//! | 0.1 % | ≈ 1000 m |
//! | 0.2 % | ≈ 500 m |
//! | 0.5 % | ≈ 200 m |
//! | 1.0 % | ≈ 100 m |

use serde::{Deserialize, Serialize};

use crate::geo_utils::LocalProjection;
use crate::GpsPoint;

/// Below this the side-length product is treated as zero (duplicate points).
const DEGENERATE_DENOMINATOR: f64 = 1e-9;

/// Below this curvature the radius is reported as infinite (`None`).
const NEGLIGIBLE_CURVATURE: f64 = 1e-12;

/// Curvature of the circle through three points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Curvature {
    /// Curvature in 1/m.
    pub curvature: f64,
    /// `curvature × 100`.
    pub curvature_percent: f64,
    /// Circumscribed radius in metres, `None` for a straight line.
    pub radius_m: Option<f64>,
    /// Triangle area in m², 0 for degenerate input.
    pub area_m2: f64,
}

impl Curvature {
    /// Result for a straight or degenerate triangle.
    pub const STRAIGHT: Curvature = Curvature {
        curvature: 0.0,
        curvature_percent: 0.0,
        radius_m: None,
        area_m2: 0.0,
    };
}

/// Menger curvature at `p2` for the path `p1 → p2 → p3`.
///
/// Never divides by zero: duplicate points yield [`Curvature::STRAIGHT`].
///
/// # Example
/// ```
/// use trainlog::GpsPoint;
/// use trainlog::curvature::menger_curvature;
///
/// let a = GpsPoint::new(47.0, 8.0);
/// let b = GpsPoint::new(47.001, 8.0);
/// let c = GpsPoint::new(47.002, 8.0);
/// let k = menger_curvature(&a, &b, &c);
/// assert!(k.curvature_percent.abs() < 1e-6);
/// assert!(k.radius_m.is_none());
/// ```
pub fn menger_curvature(p1: &GpsPoint, p2: &GpsPoint, p3: &GpsPoint) -> Curvature {
    let projection = LocalProjection::for_triangle(p1, p2, p3);
    let (x1, y1) = projection.project(p1);
    let (x2, y2) = projection.project(p2);
    let (x3, y3) = projection.project(p3);

    planar_curvature((x1, y1), (x2, y2), (x3, y3))
}

/// Menger curvature for three points already in a planar metre frame.
pub fn planar_curvature(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Curvature {
    let (x1, y1) = a;
    let (x2, y2) = b;
    let (x3, y3) = c;

    let area = ((x2 - x1) * (y3 - y1) - (y2 - y1) * (x3 - x1)).abs() / 2.0;

    let d12 = (x2 - x1).hypot(y2 - y1);
    let d23 = (x3 - x2).hypot(y3 - y2);
    let d13 = (x3 - x1).hypot(y3 - y1);

    let denominator = d12 * d23 * d13;
    if denominator < DEGENERATE_DENOMINATOR {
        return Curvature::STRAIGHT;
    }

    let curvature = 4.0 * area / denominator;
    let radius_m = if curvature > NEGLIGIBLE_CURVATURE {
        Some(1.0 / curvature)
    } else {
        None
    };

    Curvature {
        curvature,
        curvature_percent: curvature * 100.0,
        radius_m,
        area_m2: area,
    }
}
