//! Noise filter: decides whether a raw fix may move the session forward.
//!
//! Gates run in a fixed order and the first rejection wins:
//!
//! 1. validity (finite, in-range coordinates and accuracy)
//! 2. accuracy (`accuracy_m <= max_accuracy_m`)
//! 3. speed availability (`speed >= min_speed_ms`, else stationary)
//! 4. jump (`distance <= max_jump_m` from the previous accepted point)
//! 5. minimum movement (`distance >= min_movement_m`)
//!
//! Gates 1-2 leave the session untouched. Once past gate 2 the live speed
//! and the altitude window are updated even if a later gate rejects the fix.
//! A jump rejection re-anchors `previous_point` on the glitch so it cannot
//! poison later comparisons; a drift rejection does not, so small successive
//! drifts cannot creep past the movement gate.

use log::{debug, warn};

use crate::session::TrackingSession;
use crate::{AcceptedPoint, RawFix, TrackerConfig};

/// Why a fix was rejected as noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// Non-finite or out-of-range coordinates/accuracy
    InvalidFix,
    /// Horizontal accuracy worse than allowed
    Inaccurate { accuracy_m: f64 },
    /// Implausibly large move from the previous accepted point
    Jump { distance_m: f64 },
    /// Movement too small to distinguish from stationary drift
    Drift { distance_m: f64 },
}

/// Result of running a fix through the gates.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// The fix counts. `movement_m` is the distance from the previous
    /// accepted point, or `None` when there is no previous point yet.
    Accepted {
        point: AcceptedPoint,
        movement_m: Option<f64>,
    },
    /// Reported speed below the moving threshold
    RejectedStationary,
    RejectedNoisy(RejectReason),
}

/// Verdict of a single gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateVerdict {
    Pass,
    Reject {
        reason: RejectReason,
        /// Whether the candidate replaces `previous_point` despite the rejection
        advance_previous: bool,
    },
}

/// Gate over the raw fix alone.
pub type FixGate = fn(&RawFix, &TrackerConfig) -> GateVerdict;

/// Gate over the distance from the previous accepted point.
pub type MovementGate = fn(f64, &TrackerConfig) -> GateVerdict;

/// Gates that run before any state is touched, in order.
pub const FIX_GATES: [FixGate; 2] = [validity_gate, accuracy_gate];

/// Gates that run once a previous accepted point exists, in order.
pub const MOVEMENT_GATES: [MovementGate; 2] = [jump_gate, drift_gate];

pub fn validity_gate(raw: &RawFix, _config: &TrackerConfig) -> GateVerdict {
    if raw.position().is_valid() && raw.accuracy_m.is_finite() {
        GateVerdict::Pass
    } else {
        GateVerdict::Reject {
            reason: RejectReason::InvalidFix,
            advance_previous: false,
        }
    }
}

pub fn accuracy_gate(raw: &RawFix, config: &TrackerConfig) -> GateVerdict {
    if raw.accuracy_m > config.max_accuracy_m {
        GateVerdict::Reject {
            reason: RejectReason::Inaccurate {
                accuracy_m: raw.accuracy_m,
            },
            advance_previous: false,
        }
    } else {
        GateVerdict::Pass
    }
}

pub fn jump_gate(distance_m: f64, config: &TrackerConfig) -> GateVerdict {
    if distance_m > config.max_jump_m {
        GateVerdict::Reject {
            reason: RejectReason::Jump { distance_m },
            advance_previous: true,
        }
    } else {
        GateVerdict::Pass
    }
}

pub fn drift_gate(distance_m: f64, config: &TrackerConfig) -> GateVerdict {
    if distance_m < config.min_movement_m {
        GateVerdict::Reject {
            reason: RejectReason::Drift { distance_m },
            advance_previous: false,
        }
    } else {
        GateVerdict::Pass
    }
}

/// Speed in m/s with "unavailable" (≤ 0 or NaN) mapped to 0.
fn available_speed(speed_ms: f64) -> f64 {
    if speed_ms > 0.0 {
        speed_ms
    } else {
        0.0
    }
}

/// Run a raw fix through every gate, applying the gates' side effects to `session`.
pub fn filter(raw: &RawFix, session: &mut TrackingSession, config: &TrackerConfig) -> FilterOutcome {
    for gate in FIX_GATES {
        if let GateVerdict::Reject { reason, .. } = gate(raw, config) {
            if reason == RejectReason::InvalidFix {
                warn!("[NoiseFilter] Invalid fix at {}", raw.timestamp);
            } else {
                debug!("[NoiseFilter] Rejected fix at {}: {:?}", raw.timestamp, reason);
            }
            return FilterOutcome::RejectedNoisy(reason);
        }
    }

    let speed_ms = available_speed(raw.speed_ms);
    if speed_ms < config.min_speed_ms {
        session.current_speed_kmh = 0.0;
        session.push_altitude(raw.altitude_m);
        debug!("[NoiseFilter] Stationary fix at {} ({:.2} m/s)", raw.timestamp, speed_ms);
        return FilterOutcome::RejectedStationary;
    }

    let point = AcceptedPoint::from_raw(raw, speed_ms.min(config.max_speed_ms));
    session.current_speed_kmh = point.speed_kmh();
    session.push_altitude(raw.altitude_m);

    let previous = match session.previous_point {
        Some(previous) => previous,
        None => {
            return FilterOutcome::Accepted {
                point,
                movement_m: None,
            }
        }
    };

    let distance_m = config
        .distance_model
        .distance(&previous.position(), &point.position());

    for gate in MOVEMENT_GATES {
        if let GateVerdict::Reject {
            reason,
            advance_previous,
        } = gate(distance_m, config)
        {
            if advance_previous {
                session.previous_point = Some(point);
            }
            match reason {
                RejectReason::Jump { distance_m } => {
                    warn!(
                        "[NoiseFilter] Jump of {:.0}m at {}, re-anchoring",
                        distance_m, raw.timestamp
                    );
                }
                _ => debug!("[NoiseFilter] Rejected fix at {}: {:?}", raw.timestamp, reason),
            }
            return FilterOutcome::RejectedNoisy(reason);
        }
    }

    FilterOutcome::Accepted {
        point,
        movement_m: Some(distance_m),
    }
}
