//! Display polyline decimation.
//!
//! The map only needs a vertex every few metres. The polyline is fed every
//! accepted fix and is independent of the 100 m logging thresholds.

use std::collections::VecDeque;

use crate::geo_utils::DistanceModel;
use crate::GpsPoint;

/// Decimated path for display.
#[derive(Debug, Clone)]
pub struct Polyline {
    points: VecDeque<GpsPoint>,
    min_spacing_m: f64,
    max_points: usize,
    model: DistanceModel,
}

impl Polyline {
    /// Create an empty polyline keeping vertices at least `min_spacing_m` apart.
    ///
    /// When more than `max_points` vertices accumulate the oldest are dropped.
    pub fn new(min_spacing_m: f64, max_points: usize, model: DistanceModel) -> Self {
        Self {
            points: VecDeque::new(),
            min_spacing_m,
            max_points: max_points.max(1),
            model,
        }
    }

    /// Offer a point; returns true if it was appended.
    ///
    /// The first point is always kept.
    pub fn offer(&mut self, point: GpsPoint) -> bool {
        if let Some(last) = self.points.back() {
            if self.model.distance(last, &point) < self.min_spacing_m {
                return false;
            }
        }
        self.points.push_back(point);
        if self.points.len() > self.max_points {
            self.points.pop_front();
        }
        true
    }

    /// Snapshot of the vertices, oldest first.
    pub fn points(&self) -> Vec<GpsPoint> {
        self.points.iter().copied().collect()
    }

    pub fn last(&self) -> Option<&GpsPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
