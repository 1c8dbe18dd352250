//! Property tests for distance, thresholds, smoothing and curvature.

use proptest::prelude::*;
use trainlog::accumulator::crossings;
use trainlog::altitude::{median, AltitudeSmoother};
use trainlog::curvature::menger_curvature;
use trainlog::geo_utils::{offset_meters, DistanceModel};
use trainlog::GpsPoint;

fn point() -> impl Strategy<Value = GpsPoint> {
    (-80.0f64..80.0, -179.0f64..179.0).prop_map(|(lat, lon)| GpsPoint::new(lat, lon))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_distance_is_symmetric(a in point(), b in point()) {
        for model in [DistanceModel::Haversine, DistanceModel::Geodesic] {
            let ab = model.distance(&a, &b);
            let ba = model.distance(&b, &a);
            prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0));
        }
    }

    #[test]
    fn prop_distance_to_self_is_zero(p in point()) {
        prop_assert_eq!(DistanceModel::Haversine.distance(&p, &p), 0.0);
        prop_assert!(DistanceModel::Geodesic.distance(&p, &p).abs() < 1e-6);
    }

    #[test]
    fn prop_thresholds_follow_total(steps in prop::collection::vec(0u32..1200, 1..60)) {
        // Whole-metre steps keep the arithmetic exact
        let interval = 100.0;
        let mut total = 0.0;
        let mut next = interval;
        let mut emitted = 0usize;
        for step in steps {
            total += step as f64;
            let n = crossings(total, next, interval);
            emitted += n;
            next += n as f64 * interval;
            prop_assert!(next > total);
            prop_assert_eq!(next, interval * (emitted as f64 + 1.0));
        }
        prop_assert_eq!(emitted, (total / interval).floor() as usize);
    }

    #[test]
    fn prop_smoothed_altitude_within_window(samples in prop::collection::vec(-400.0f64..4800.0, 1..40)) {
        let mut smoother = AltitudeSmoother::new(5);
        for &s in &samples {
            smoother.push(s);
        }
        prop_assert!(smoother.len() <= 5);
        let window = &samples[samples.len().saturating_sub(5)..];
        let lo = window.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let smoothed = smoother.smoothed();
        prop_assert!(smoothed >= lo && smoothed <= hi);
        prop_assert_eq!(smoothed, median(window.iter().cloned()));
    }

    #[test]
    fn prop_circle_radius_recovered(
        lat in -60.0f64..60.0,
        lon in -170.0f64..170.0,
        radius in 150.0f64..3000.0,
        start in 0.0f64..6.2,
    ) {
        let center = GpsPoint::new(lat, lon);
        let step = 100.0 / radius;
        let on_circle = |angle: f64| offset_meters(&center, radius * angle.sin(), radius * angle.cos());
        let k = menger_curvature(&on_circle(start), &on_circle(start + step), &on_circle(start + 2.0 * step));
        let r = k.radius_m.unwrap();
        prop_assert!((r - radius).abs() / radius < 0.02, "expected {}, got {}", radius, r);
    }
}
