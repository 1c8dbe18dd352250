//! Distance-indexed log records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the distance log, emitted each time the travelled distance
/// crosses a logging threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 1-based, increases by one per record within a session
    pub index: u64,
    /// Time of the fix that crossed the threshold
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Speed at the crossing fix in km/h
    pub speed_kmh: f64,
    /// Median-filtered altitude in metres
    pub altitude_m: f64,
    /// Distance from the previous log point in metres
    pub segment_distance_m: f64,
    /// Smoothed altitude change since the previous log point
    pub elevation_delta_m: Option<f64>,
    pub grade_percent: Option<f64>,
    /// The threshold that was crossed (multiple of the logging interval)
    pub total_distance_m: f64,
    pub curvature_percent: Option<f64>,
    /// Circumscribed radius; `None` on straight track or before the third record
    pub curve_radius_m: Option<f64>,
}

impl LogRecord {
    /// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T08:30:00.000Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Flat row in export column order.
///
/// Optional values serialize as empty cells.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub index: u64,
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    pub altitude_m: f64,
    pub segment_distance_m: f64,
    pub elevation_delta_m: Option<f64>,
    pub grade_percent: Option<f64>,
    pub curvature_percent: Option<f64>,
    pub curve_radius_m: Option<f64>,
    pub total_distance_m: f64,
}

impl From<&LogRecord> for ExportRow {
    fn from(record: &LogRecord) -> Self {
        Self {
            index: record.index,
            timestamp: record.timestamp_iso(),
            latitude: record.latitude,
            longitude: record.longitude,
            speed_kmh: record.speed_kmh,
            altitude_m: record.altitude_m,
            segment_distance_m: record.segment_distance_m,
            elevation_delta_m: record.elevation_delta_m,
            grade_percent: record.grade_percent,
            curvature_percent: record.curvature_percent,
            curve_radius_m: record.curve_radius_m,
            total_distance_m: record.total_distance_m,
        }
    }
}
