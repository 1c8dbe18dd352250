//! # Tracker
//!
//! Stateful front door of the library. A `Tracker` owns one
//! [`TrackingSession`] and its configuration and turns raw fixes into log
//! records, one fix at a time:
//!
//! ```text
//! RawFix ─▶ noise filter ─▶ distance accumulator ─▶ 0..N LogRecords
//!                │                    │
//!                └─ altitude window   └─ path decimator
//! ```
//!
//! Records are returned to the caller, who owns their persistence. The
//! tracker performs no I/O and never fails on input.

use log::{debug, info};

use crate::accumulator::accumulate;
use crate::error::Result;
use crate::filter::{filter, FilterOutcome, RejectReason};
use crate::record::LogRecord;
use crate::session::{LiveTelemetry, TrackingSession};
use crate::store::RecordStore;
use crate::{RawFix, TrackerConfig};

/// Turns a stream of raw GPS fixes into distance-indexed log records.
#[derive(Debug, Clone)]
pub struct Tracker {
    config: TrackerConfig,
    session: TrackingSession,
    tracking: bool,
    stats: TrackerStats,
}

impl Tracker {
    /// Create a tracker with default configuration, already tracking.
    pub fn new() -> Self {
        let config = TrackerConfig::default();
        Self {
            session: TrackingSession::new(&config),
            config,
            tracking: true,
            stats: TrackerStats::default(),
        }
    }

    /// Create a tracker with custom configuration.
    ///
    /// Fails if the configuration does not pass [`TrackerConfig::validate`].
    pub fn with_config(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            session: TrackingSession::new(&config),
            config,
            tracking: true,
            stats: TrackerStats::default(),
        })
    }

    // ========================================================================
    // Fix Processing
    // ========================================================================

    /// Process one raw fix to completion and return the records it produced.
    ///
    /// Returns an empty list for rejected fixes, for fixes that do not cross
    /// a threshold, and while tracking is stopped.
    pub fn process(&mut self, raw: &RawFix) -> Vec<LogRecord> {
        if !self.tracking {
            debug!("[Tracker] Ignoring fix at {} while stopped", raw.timestamp);
            return Vec::new();
        }
        self.stats.fixes_processed += 1;

        match filter(raw, &mut self.session, &self.config) {
            FilterOutcome::RejectedStationary => {
                self.stats.stationary_fixes += 1;
                Vec::new()
            }
            FilterOutcome::RejectedNoisy(reason) => {
                match reason {
                    RejectReason::Jump { .. } => self.stats.jump_rejections += 1,
                    _ => self.stats.noise_rejections += 1,
                }
                Vec::new()
            }
            FilterOutcome::Accepted {
                point,
                movement_m: None,
            } => {
                self.stats.accepted_fixes += 1;
                self.session.last_logged = Some(self.session.logged(point, None));
                self.session.previous_point = Some(point);
                self.session.polyline.offer(point.position());
                info!(
                    "[Tracker] Origin set at ({:.6}, {:.6}), {:.0}m travelled so far",
                    point.latitude, point.longitude, self.session.total_distance_m
                );
                Vec::new()
            }
            FilterOutcome::Accepted {
                point,
                movement_m: Some(distance_m),
            } => {
                self.stats.accepted_fixes += 1;
                self.session.previous_point = Some(point);
                let records = accumulate(&mut self.session, point, distance_m, &self.config);
                self.session.polyline.offer(point.position());
                self.stats.records_emitted += records.len() as u64;
                records
            }
        }
    }

    /// Process a fix and append any resulting records to `store`.
    ///
    /// Returns the number of records written.
    pub fn process_into(&mut self, raw: &RawFix, store: &mut dyn RecordStore) -> Result<usize> {
        let records = self.process(raw);
        if !records.is_empty() {
            store.append(&records)?;
        }
        Ok(records.len())
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Resume feeding fixes after [`stop`](Self::stop).
    pub fn start(&mut self) {
        if !self.tracking {
            info!(
                "[Tracker] Resuming at {:.0}m, next record at {:.0}m",
                self.session.total_distance_m, self.session.next_log_threshold_m
            );
        }
        self.tracking = true;
    }

    /// Stop accepting fixes. All session state is kept.
    pub fn stop(&mut self) {
        if self.tracking {
            info!(
                "[Tracker] Stopped at {:.0}m after {} records",
                self.session.total_distance_m, self.session.record_index
            );
        }
        self.tracking = false;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Discard the current session and start from zero.
    pub fn new_session(&mut self) {
        self.session = TrackingSession::new(&self.config);
        self.stats = TrackerStats::default();
        info!("[Tracker] New session");
    }

    /// Continue counting from a previously persisted record.
    ///
    /// The next record gets index `record.index + 1` and the next threshold is
    /// `record.total_distance_m` plus one interval. The next accepted fix
    /// becomes the new origin.
    pub fn resume_from(&mut self, record: &LogRecord) {
        self.session =
            TrackingSession::resumed(&self.config, record.index, record.total_distance_m);
        info!(
            "[Tracker] Resumed from record #{} at {:.0}m",
            record.index, record.total_distance_m
        );
    }

    /// Resume from the last record in `store`, or start fresh if it is empty.
    pub fn resume_from_store(&mut self, store: &dyn RecordStore) -> Result<()> {
        match store.last()? {
            Some(record) => self.resume_from(&record),
            None => self.new_session(),
        }
        Ok(())
    }

    // ========================================================================
    // Read-only Views
    // ========================================================================

    /// Live values for the display layer.
    pub fn telemetry(&self) -> LiveTelemetry {
        self.session.telemetry(self.tracking)
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats.clone()
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters since the session started, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrackerStats {
    pub fixes_processed: u64,
    pub accepted_fixes: u64,
    pub stationary_fixes: u64,
    pub noise_rejections: u64,
    pub jump_rejections: u64,
    pub records_emitted: u64,
}

// ============================================================================
// Tests
// ============================================================================
