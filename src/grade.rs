//! Grade (slope) between consecutive log points.

/// Percentage grade for a rise of `elevation_delta_m` over `segment_distance_m`.
///
/// Returns 0 for a non-positive run.
///
/// # Example
/// ```
/// use trainlog::grade::grade_percent;
/// assert_eq!(grade_percent(6.0, 100.0), 6.0);
/// assert_eq!(grade_percent(2.0, 0.0), 0.0);
/// ```
pub fn grade_percent(elevation_delta_m: f64, segment_distance_m: f64) -> f64 {
    if segment_distance_m <= 0.0 {
        return 0.0;
    }
    (elevation_delta_m / segment_distance_m) * 100.0
}

/// Elevation delta and grade for a segment, or `(None, None)` when the segment
/// is too short for the ratio to mean anything.
pub fn segment_grade(
    smoothed_altitude_m: f64,
    previous_altitude_m: f64,
    segment_distance_m: f64,
    min_segment_m: f64,
) -> (Option<f64>, Option<f64>) {
    if segment_distance_m <= min_segment_m {
        return (None, None);
    }
    let delta = smoothed_altitude_m - previous_altitude_m;
    (Some(delta), Some(grade_percent(delta, segment_distance_m)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_values() {
        assert_eq!(grade_percent(6.0, 100.0), 6.0);
        assert_eq!(grade_percent(-3.0, 100.0), -3.0);
        assert!((grade_percent(4.0, 97.5) - 4.1026).abs() < 1e-4);
    }

    #[test]
    fn test_grade_non_positive_distance() {
        assert_eq!(grade_percent(5.0, 0.0), 0.0);
        assert_eq!(grade_percent(5.0, -10.0), 0.0);
    }

    #[test]
    fn test_segment_grade_short_segment() {
        assert_eq!(segment_grade(110.0, 100.0, 0.5, 1.0), (None, None));
        assert_eq!(segment_grade(110.0, 100.0, 1.0, 1.0), (None, None));
    }

    #[test]
    fn test_segment_grade_populated() {
        let (delta, grade) = segment_grade(103.0, 100.0, 100.0, 1.0);
        assert_eq!(delta, Some(3.0));
        assert_eq!(grade, Some(3.0));
    }
}
