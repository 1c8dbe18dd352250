//! # Trainlog
//!
//! GPS noise filtering and distance-indexed logging for trains.
//!
//! Raw location fixes go in; one [`LogRecord`] comes out every 100 m of
//! filtered travel, carrying position, speed, smoothed altitude, grade and
//! track curvature. A decimated polyline and live values are kept for the
//! map display.
//!
//! This library provides:
//! - A noise filter (accuracy, stationary, jump and drift gates)
//! - A distance accumulator emitting records at fixed intervals
//! - Median altitude smoothing, grade and Menger curvature per record
//! - Record stores (in-memory, SQLite) and CSV/JSON export
//!
//! ## Features
//!
//! - **`persistence`** - SQLite record store via rusqlite
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use trainlog::{RawFix, Tracker};
//!
//! let mut tracker = Tracker::new();
//! let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
//!
//! // Roughly 111 m per 0.001° of latitude
//! for i in 0..3 {
//!     let fix = RawFix::new(47.0 + i as f64 * 0.001, 8.0, 420.0, 5.0, 25.0, t0);
//!     for record in tracker.process(&fix) {
//!         println!("#{} at {} m", record.index, record.total_distance_m);
//!     }
//! }
//! assert_eq!(tracker.session().record_index(), 2);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackerError};

// Distance, projection and offsets
pub mod geo_utils;
pub use geo_utils::DistanceModel;

// Per-record derived values
pub mod altitude;
pub mod curvature;
pub mod grade;

// Display polyline
pub mod decimator;

pub mod record;
pub use record::LogRecord;

// Pipeline stages and the state they share
pub mod accumulator;
pub mod filter;
pub mod session;
pub use session::{LiveTelemetry, TrackingSession};

// Stateful front door
pub mod tracker;
pub use tracker::{Tracker, TrackerStats};

// Record storage and export
pub mod export;
pub mod store;
pub use store::{MemoryRecordStore, RecordStore};

#[cfg(feature = "persistence")]
pub mod persistence;
#[cfg(feature = "persistence")]
pub use persistence::SqliteRecordStore;

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("TrainlogRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use trainlog::GpsPoint;
/// let point = GpsPoint::new(47.3769, 8.5417); // Zürich HB
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// A location fix as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in metres, often noisy
    pub altitude_m: f64,
    /// Horizontal accuracy radius in metres
    pub accuracy_m: f64,
    /// Reported speed in m/s; zero, negative or NaN means unavailable
    pub speed_ms: f64,
    pub timestamp: DateTime<Utc>,
}

impl RawFix {
    pub fn new(
        latitude: f64,
        longitude: f64,
        altitude_m: f64,
        accuracy_m: f64,
        speed_ms: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m,
            accuracy_m,
            speed_ms,
            timestamp,
        }
    }

    pub fn position(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }
}

/// A fix that passed the accuracy and speed gates.
///
/// Speed is clamped to `[0, max_speed_ms]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub speed_ms: f64,
    pub timestamp: DateTime<Utc>,
}

impl AcceptedPoint {
    /// Promote a raw fix, replacing its speed with the clamped value.
    pub fn from_raw(raw: &RawFix, speed_ms: f64) -> Self {
        Self {
            latitude: raw.latitude,
            longitude: raw.longitude,
            altitude_m: raw.altitude_m,
            speed_ms,
            timestamp: raw.timestamp,
        }
    }

    pub fn position(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_ms * 3.6
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Largest accepted altitude median window.
pub const MAX_ALTITUDE_WINDOW: u32 = 255;

/// Largest accepted display polyline capacity.
pub const MAX_POLYLINE_POINTS: u32 = 1_000_000;

/// Configuration for filtering and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrackerConfig {
    /// Distance between log records.
    /// Default: 100.0 meters
    pub log_interval_m: f64,

    /// Fixes with a worse horizontal accuracy are rejected.
    /// Default: 20.0 meters
    pub max_accuracy_m: f64,

    /// Below this reported speed the train is considered stationary.
    /// Default: 1.0 m/s
    pub min_speed_ms: f64,

    /// Reported speeds are clamped to this value.
    /// Default: 83.0 m/s (~300 km/h)
    pub max_speed_ms: f64,

    /// A move longer than this from the previous accepted point is a glitch.
    /// Default: 500.0 meters
    pub max_jump_m: f64,

    /// A move shorter than this is treated as drift.
    /// Default: 5.0 meters
    pub min_movement_m: f64,

    /// Number of altitude samples in the median window.
    /// Default: 5
    pub altitude_window: u32,

    /// Segments at or below this length get no grade.
    /// Default: 1.0 meter
    pub min_grade_segment_m: f64,

    /// Minimum spacing between display polyline points.
    /// Default: 8.0 meters
    pub decimation_distance_m: f64,

    /// Display polyline capacity, oldest points evicted first.
    /// Default: 20000
    pub max_polyline_points: u32,

    /// Distance formula used for movement, segments and decimation.
    /// Default: Haversine
    pub distance_model: DistanceModel,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            log_interval_m: 100.0,
            max_accuracy_m: 20.0,
            min_speed_ms: 1.0,
            max_speed_ms: 83.0,
            max_jump_m: 500.0,
            min_movement_m: 5.0,
            altitude_window: altitude::DEFAULT_ALTITUDE_WINDOW as u32,
            min_grade_segment_m: 1.0,
            decimation_distance_m: 8.0,
            max_polyline_points: 20_000,
            distance_model: DistanceModel::Haversine,
        }
    }
}

impl TrackerConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        positive("log_interval_m", self.log_interval_m)?;
        positive("max_accuracy_m", self.max_accuracy_m)?;
        non_negative("min_speed_ms", self.min_speed_ms)?;
        positive("max_speed_ms", self.max_speed_ms)?;
        positive("max_jump_m", self.max_jump_m)?;
        non_negative("min_movement_m", self.min_movement_m)?;
        non_negative("min_grade_segment_m", self.min_grade_segment_m)?;
        positive("decimation_distance_m", self.decimation_distance_m)?;

        if self.min_speed_ms > self.max_speed_ms {
            return Err(TrackerError::config(
                "min_speed_ms",
                format!("must not exceed max_speed_ms ({})", self.max_speed_ms),
            ));
        }
        if self.min_movement_m > self.max_jump_m {
            return Err(TrackerError::config(
                "min_movement_m",
                format!("must not exceed max_jump_m ({})", self.max_jump_m),
            ));
        }
        if self.altitude_window == 0 || self.altitude_window > MAX_ALTITUDE_WINDOW {
            return Err(TrackerError::config(
                "altitude_window",
                format!("must be between 1 and {}", MAX_ALTITUDE_WINDOW),
            ));
        }
        if self.max_polyline_points == 0 || self.max_polyline_points > MAX_POLYLINE_POINTS {
            return Err(TrackerError::config(
                "max_polyline_points",
                format!("must be between 1 and {}", MAX_POLYLINE_POINTS),
            ));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TrackerError::config(
            field,
            format!("must be a positive number, got {}", value),
        ))
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TrackerError::config(
            field,
            format!("must be zero or positive, got {}", value),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
