//! FFI bindings for mobile platforms (iOS/Android).
//!
//! The mobile shell owns location updates, storage and UI. It pushes fixes
//! into one process-wide [`Tracker`] and persists whatever records come back.
//! Timestamps cross the boundary as Unix epoch milliseconds.

use chrono::{DateTime, Utc};
use log::{info, warn};
use once_cell::sync::Lazy;
use std::sync::Mutex;

use crate::error::TrackerError;
use crate::session::LiveTelemetry;
use crate::{export, init_logging, LogRecord, RawFix, Tracker, TrackerConfig, TrackerStats};

/// Global tracker instance.
static TRACKER: Lazy<Mutex<Tracker>> = Lazy::new(|| Mutex::new(Tracker::new()));

/// Run `f` with exclusive access to the global tracker.
fn with_tracker<F, R>(f: F) -> Result<R, TrackerError>
where
    F: FnOnce(&mut Tracker) -> R,
{
    let mut tracker = TRACKER.lock().map_err(|e| TrackerError::Internal {
        message: format!("tracker lock poisoned: {}", e),
    })?;
    Ok(f(&mut tracker))
}

fn from_millis(timestamp_ms: i64) -> Result<DateTime<Utc>, TrackerError> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        TrackerError::SerializationError {
            message: format!("timestamp {} ms out of range", timestamp_ms),
        }
    })
}

// ============================================================================
// FFI Types
// ============================================================================

/// A location fix from the platform.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRawFix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub accuracy_m: f64,
    /// m/s, zero or negative when unavailable
    pub speed_ms: f64,
    pub timestamp_ms: i64,
}

impl FfiRawFix {
    fn to_raw(&self) -> Result<RawFix, TrackerError> {
        Ok(RawFix::new(
            self.latitude,
            self.longitude,
            self.altitude_m,
            self.accuracy_m,
            self.speed_ms,
            from_millis(self.timestamp_ms)?,
        ))
    }
}

/// A log record in flat form.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiLogRecord {
    pub index: u64,
    pub timestamp_ms: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    pub altitude_m: f64,
    pub segment_distance_m: f64,
    pub elevation_delta_m: Option<f64>,
    pub grade_percent: Option<f64>,
    pub total_distance_m: f64,
    pub curvature_percent: Option<f64>,
    pub curve_radius_m: Option<f64>,
}

impl From<&LogRecord> for FfiLogRecord {
    fn from(record: &LogRecord) -> Self {
        Self {
            index: record.index,
            timestamp_ms: record.timestamp.timestamp_millis(),
            latitude: record.latitude,
            longitude: record.longitude,
            speed_kmh: record.speed_kmh,
            altitude_m: record.altitude_m,
            segment_distance_m: record.segment_distance_m,
            elevation_delta_m: record.elevation_delta_m,
            grade_percent: record.grade_percent,
            total_distance_m: record.total_distance_m,
            curvature_percent: record.curvature_percent,
            curve_radius_m: record.curve_radius_m,
        }
    }
}

impl FfiLogRecord {
    fn to_record(&self) -> Result<LogRecord, TrackerError> {
        Ok(LogRecord {
            index: self.index,
            timestamp: from_millis(self.timestamp_ms)?,
            latitude: self.latitude,
            longitude: self.longitude,
            speed_kmh: self.speed_kmh,
            altitude_m: self.altitude_m,
            segment_distance_m: self.segment_distance_m,
            elevation_delta_m: self.elevation_delta_m,
            grade_percent: self.grade_percent,
            total_distance_m: self.total_distance_m,
            curvature_percent: self.curvature_percent,
            curve_radius_m: self.curve_radius_m,
        })
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Get default tracker configuration.
#[uniffi::export]
pub fn default_tracker_config() -> TrackerConfig {
    TrackerConfig::default()
}

/// Replace the global tracker with a fresh one using `config`.
#[uniffi::export]
pub fn tracker_init(config: TrackerConfig) -> Result<(), TrackerError> {
    init_logging();
    let tracker = Tracker::with_config(config)?;
    with_tracker(|t| *t = tracker)?;
    info!("[TrainlogRust] Tracker initialized");
    Ok(())
}

// ============================================================================
// Fix Processing
// ============================================================================

/// Process one fix; returns the records to persist (usually none).
#[uniffi::export]
pub fn tracker_process(fix: FfiRawFix) -> Result<Vec<FfiLogRecord>, TrackerError> {
    let raw = fix.to_raw()?;
    let records = with_tracker(|t| t.process(&raw))?;
    Ok(records.iter().map(FfiLogRecord::from).collect())
}

/// Process buffered fixes in order (e.g. after the app was backgrounded).
#[uniffi::export]
pub fn tracker_process_batch(fixes: Vec<FfiRawFix>) -> Result<Vec<FfiLogRecord>, TrackerError> {
    let raws = fixes
        .iter()
        .map(FfiRawFix::to_raw)
        .collect::<Result<Vec<_>, _>>()?;
    let records = with_tracker(|t| {
        raws.iter()
            .flat_map(|raw| t.process(raw))
            .collect::<Vec<_>>()
    })?;
    info!(
        "[TrainlogRust] Batch of {} fixes produced {} records",
        raws.len(),
        records.len()
    );
    Ok(records.iter().map(FfiLogRecord::from).collect())
}

// ============================================================================
// Session Lifecycle
// ============================================================================

#[uniffi::export]
pub fn tracker_start() -> Result<(), TrackerError> {
    with_tracker(|t| t.start())
}

#[uniffi::export]
pub fn tracker_stop() -> Result<(), TrackerError> {
    with_tracker(|t| t.stop())
}

#[uniffi::export]
pub fn tracker_new_session() -> Result<(), TrackerError> {
    with_tracker(|t| t.new_session())
}

/// Continue counting after the last persisted record.
#[uniffi::export]
pub fn tracker_resume(last: FfiLogRecord) -> Result<(), TrackerError> {
    init_logging();
    let record = last.to_record()?;
    with_tracker(|t| t.resume_from(&record))
}

// ============================================================================
// Read-only Views
// ============================================================================

#[uniffi::export]
pub fn tracker_telemetry() -> Result<LiveTelemetry, TrackerError> {
    with_tracker(|t| t.telemetry())
}

#[uniffi::export]
pub fn tracker_stats() -> Result<TrackerStats, TrackerError> {
    with_tracker(|t| t.stats())
}

// ============================================================================
// Export
// ============================================================================

/// Render records as CSV for sharing.
#[uniffi::export]
pub fn export_records_csv(records: Vec<FfiLogRecord>) -> Result<String, TrackerError> {
    let records = records
        .iter()
        .map(FfiLogRecord::to_record)
        .collect::<Result<Vec<_>, _>>()?;
    if records.is_empty() {
        warn!("[TrainlogRust] Exporting an empty log");
    }
    export::to_csv_string(&records)
}

/// Render records as a JSON array.
#[uniffi::export]
pub fn export_records_json(records: Vec<FfiLogRecord>) -> Result<String, TrackerError> {
    let records = records
        .iter()
        .map(FfiLogRecord::to_record)
        .collect::<Result<Vec<_>, _>>()?;
    export::to_json(&records)
}
