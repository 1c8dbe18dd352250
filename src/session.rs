//! Mutable state of one tracking run.
//!
//! A `TrackingSession` is owned by exactly one [`Tracker`](crate::Tracker)
//! and mutated only through `&mut` during a single `process` call.

use serde::{Deserialize, Serialize};

use crate::altitude::AltitudeSmoother;
use crate::decimator::Polyline;
use crate::{AcceptedPoint, GpsPoint, TrackerConfig};

/// An accepted point that became a log point (or the session origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggedPoint {
    pub point: AcceptedPoint,
    /// Smoothed altitude at the moment the point was logged
    pub altitude_at_logging: f64,
    /// Index of the record emitted here, `None` for the session origin
    pub record_index: Option<u64>,
}

/// Distance totals, anchors and live values for one run.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    pub(crate) total_distance_m: f64,
    pub(crate) next_log_threshold_m: f64,
    pub(crate) record_index: u64,
    pub(crate) previous_point: Option<AcceptedPoint>,
    pub(crate) last_logged: Option<LoggedPoint>,
    pub(crate) second_last_logged: Option<LoggedPoint>,
    pub(crate) altitude: AltitudeSmoother,
    pub(crate) polyline: Polyline,
    pub(crate) current_speed_kmh: f64,
    pub(crate) current_altitude_m: f64,
}

impl TrackingSession {
    /// Fresh session: zero distance, first threshold one interval away.
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            total_distance_m: 0.0,
            next_log_threshold_m: config.log_interval_m,
            record_index: 0,
            previous_point: None,
            last_logged: None,
            second_last_logged: None,
            altitude: AltitudeSmoother::new(config.altitude_window as usize),
            polyline: Polyline::new(
                config.decimation_distance_m,
                config.max_polyline_points as usize,
                config.distance_model,
            ),
            current_speed_kmh: 0.0,
            current_altitude_m: 0.0,
        }
    }

    /// Session continuing counters from a previously persisted record.
    ///
    /// Anchors are cleared, so the next accepted fix becomes the new origin.
    pub fn resumed(config: &TrackerConfig, record_index: u64, total_distance_m: f64) -> Self {
        let mut session = Self::new(config);
        session.record_index = record_index;
        session.total_distance_m = total_distance_m;
        session.next_log_threshold_m = total_distance_m + config.log_interval_m;
        session
    }

    /// Push an altitude sample and refresh the live altitude.
    pub(crate) fn push_altitude(&mut self, altitude_m: f64) {
        self.altitude.push(altitude_m);
        self.current_altitude_m = self.altitude.smoothed();
    }

    /// Snapshot an accepted point as a logged point at the current smoothed altitude.
    pub(crate) fn logged(&self, point: AcceptedPoint, record_index: Option<u64>) -> LoggedPoint {
        LoggedPoint {
            point,
            altitude_at_logging: self.altitude.smoothed(),
            record_index,
        }
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn next_log_threshold_m(&self) -> f64 {
        self.next_log_threshold_m
    }

    pub fn record_index(&self) -> u64 {
        self.record_index
    }

    pub fn previous_point(&self) -> Option<&AcceptedPoint> {
        self.previous_point.as_ref()
    }

    pub fn last_logged(&self) -> Option<&LoggedPoint> {
        self.last_logged.as_ref()
    }

    pub fn second_last_logged(&self) -> Option<&LoggedPoint> {
        self.second_last_logged.as_ref()
    }

    pub fn smoothed_altitude_m(&self) -> f64 {
        self.altitude.smoothed()
    }

    pub fn altitude_samples(&self) -> usize {
        self.altitude.len()
    }

    pub fn current_speed_kmh(&self) -> f64 {
        self.current_speed_kmh
    }

    pub fn current_altitude_m(&self) -> f64 {
        self.current_altitude_m
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    /// Read-only view for the display layer.
    pub fn telemetry(&self, tracking: bool) -> LiveTelemetry {
        LiveTelemetry {
            tracking,
            polyline: self.polyline.points(),
            current_speed_kmh: self.current_speed_kmh,
            current_altitude_m: self.current_altitude_m,
            total_distance_m: self.total_distance_m,
            next_log_threshold_m: self.next_log_threshold_m,
            record_count: self.record_index,
        }
    }
}

/// Live values the map/dashboard reads between fixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LiveTelemetry {
    pub tracking: bool,
    pub polyline: Vec<GpsPoint>,
    pub current_speed_kmh: f64,
    pub current_altitude_m: f64,
    pub total_distance_m: f64,
    pub next_log_threshold_m: f64,
    pub record_count: u64,
}
