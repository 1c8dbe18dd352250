//! Distance accumulator and threshold engine.
//!
//! Accepted movement is added to the running total. Every time the total
//! reaches the pending threshold a [`LogRecord`] is built at the current
//! point and the threshold advances by one logging interval. A single large
//! movement can cross several thresholds; all of those records share the
//! current point and differ only in index and recorded total, which is the
//! threshold value rather than the running total.

use log::info;

use crate::curvature::menger_curvature;
use crate::grade::segment_grade;
use crate::record::LogRecord;
use crate::session::TrackingSession;
use crate::{AcceptedPoint, TrackerConfig};

/// Number of thresholds crossed when the total reaches `total_m`.
///
/// # Example
/// ```
/// use trainlog::accumulator::crossings;
/// // 50 m travelled, next log at 100 m, then a 200 m move
/// assert_eq!(crossings(50.0 + 200.0, 100.0, 100.0), 2);
/// // Landing exactly on a threshold counts as crossing it
/// assert_eq!(crossings(50.0 + 250.0, 100.0, 100.0), 3);
/// ```
pub fn crossings(total_m: f64, next_threshold_m: f64, interval_m: f64) -> usize {
    if interval_m <= 0.0 || total_m < next_threshold_m {
        return 0;
    }
    let mut next = next_threshold_m;
    let mut count = 0;
    while total_m >= next {
        count += 1;
        next += interval_m;
    }
    count
}

/// Add `distance_m` of accepted movement ending at `point` and emit a record
/// for every threshold crossed.
pub fn accumulate(
    session: &mut TrackingSession,
    point: AcceptedPoint,
    distance_m: f64,
    config: &TrackerConfig,
) -> Vec<LogRecord> {
    session.total_distance_m += distance_m;

    let mut records = Vec::new();
    while session.total_distance_m >= session.next_log_threshold_m {
        session.record_index += 1;
        let record = build_record(session, &point, config);

        // The origin never becomes the far end of a curvature triangle
        session.second_last_logged = session.last_logged.filter(|l| l.record_index.is_some());
        session.last_logged = Some(session.logged(point, Some(session.record_index)));
        session.next_log_threshold_m += config.log_interval_m;

        info!(
            "[Tracker] Record #{} at {:.0}m: {:.1} km/h, alt {:.1}m, grade {}, radius {}",
            record.index,
            record.total_distance_m,
            record.speed_kmh,
            record.altitude_m,
            fmt_opt(record.grade_percent, "%"),
            fmt_opt(record.curve_radius_m, "m"),
        );
        records.push(record);
    }
    records
}

/// Build the record for the threshold currently pending in `session`.
fn build_record(session: &TrackingSession, point: &AcceptedPoint, config: &TrackerConfig) -> LogRecord {
    let current = point.position();
    let smoothed_altitude = session.smoothed_altitude_m();

    let (segment_distance_m, elevation_delta_m, grade_percent) = match session.last_logged {
        Some(last) => {
            let segment = config
                .distance_model
                .distance(&last.point.position(), &current);
            let (delta, grade) = segment_grade(
                smoothed_altitude,
                last.altitude_at_logging,
                segment,
                config.min_grade_segment_m,
            );
            (segment, delta, grade)
        }
        None => (0.0, None, None),
    };

    let (curvature_percent, curve_radius_m) =
        match (session.second_last_logged, session.last_logged) {
            (Some(p1), Some(p2)) => {
                let k = menger_curvature(&p1.point.position(), &p2.point.position(), &current);
                (Some(k.curvature_percent), k.radius_m)
            }
            _ => (None, None),
        };

    LogRecord {
        index: session.record_index,
        timestamp: point.timestamp,
        latitude: point.latitude,
        longitude: point.longitude,
        speed_kmh: point.speed_kmh(),
        altitude_m: smoothed_altitude,
        segment_distance_m,
        elevation_delta_m,
        grade_percent,
        total_distance_m: session.next_log_threshold_m,
        curvature_percent,
        curve_radius_m,
    }
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{:.2}{}", v, unit))
        .unwrap_or_else(|| "-".to_string())
}
