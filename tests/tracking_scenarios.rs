//! End-to-end scenarios: raw fixes in, records out.

use chrono::{DateTime, Duration, TimeZone, Utc};
use trainlog::export;
use trainlog::geo_utils::{haversine_distance, offset_meters};
use trainlog::{GpsPoint, MemoryRecordStore, RawFix, RecordStore, Tracker, TrackerConfig};

const STATION: GpsPoint = GpsPoint {
    latitude: 47.3779,
    longitude: 8.5403,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn t(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 3, 6, 15, 0).unwrap() + Duration::seconds(seconds)
}

fn fix(point: GpsPoint, altitude_m: f64, speed_ms: f64, seconds: i64) -> RawFix {
    RawFix::new(
        point.latitude,
        point.longitude,
        altitude_m,
        6.0,
        speed_ms,
        t(seconds),
    )
}

#[test]
fn stationary_train_logs_nothing() {
    init();
    let mut tracker = Tracker::new();
    for s in 0..120 {
        // GPS wander of a few metres with no reported speed
        let wander = offset_meters(&STATION, (s % 7) as f64, (s % 5) as f64);
        let records = tracker.process(&fix(wander, 410.0, 0.2, s));
        assert!(records.is_empty());
    }
    assert_eq!(tracker.session().total_distance_m(), 0.0);
    assert_eq!(tracker.session().record_index(), 0);
    assert_eq!(tracker.stats().stationary_fixes, 120);
}

#[test]
fn platform_drift_while_moving_slowly_is_ignored() {
    init();
    let mut tracker = Tracker::new();
    tracker.process(&fix(STATION, 410.0, 1.5, 0));
    // Speed above the stationary threshold but every fix within 5 m of the origin
    for s in 1..60 {
        let p = offset_meters(&STATION, (s % 4) as f64, 0.0);
        assert!(tracker.process(&fix(p, 410.0, 1.5, s)).is_empty());
    }
    assert_eq!(tracker.session().total_distance_m(), 0.0);
}

#[test]
fn large_accepted_gap_emits_several_records_at_one_point() {
    init();
    let mut tracker = Tracker::new();
    tracker.process(&fix(STATION, 410.0, 30.0, 0));

    let far = offset_meters(&STATION, 450.0, 0.0);
    let records = tracker.process(&fix(far, 410.0, 30.0, 15));

    assert_eq!(records.len(), 4);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.index, i as u64 + 1);
        assert_eq!(record.total_distance_m, (i as f64 + 1.0) * 100.0);
        assert_eq!(record.latitude, far.latitude);
        assert_eq!(record.longitude, far.longitude);
    }
    assert!((records[0].segment_distance_m - 450.0).abs() < 0.1);
    assert_eq!(records[3].segment_distance_m, 0.0);
    assert_eq!(tracker.session().next_log_threshold_m(), 500.0);
}

#[test]
fn teleport_is_rejected_and_tracking_continues_from_there() {
    init();
    let mut tracker = Tracker::new();
    for s in 0..4 {
        tracker.process(&fix(offset_meters(&STATION, s as f64 * 20.0, 0.0), 410.0, 20.0, s));
    }
    let before = tracker.session().total_distance_m();
    assert!((before - 60.0).abs() < 0.1);

    // 5 km glitch, then normal movement around the glitch position
    let glitch = offset_meters(&STATION, 5000.0, 0.0);
    assert!(tracker.process(&fix(glitch, 410.0, 20.0, 4)).is_empty());
    assert_eq!(tracker.session().total_distance_m(), before);
    assert_eq!(tracker.stats().jump_rejections, 1);

    let next = offset_meters(&glitch, 25.0, 0.0);
    tracker.process(&fix(next, 410.0, 20.0, 5));
    assert!((tracker.session().total_distance_m() - 85.0).abs() < 0.1);
}

#[test]
fn inaccurate_fixes_do_not_disturb_the_log() {
    init();
    let mut clean = Tracker::new();
    let mut noisy = Tracker::new();
    let mut clean_records = Vec::new();
    let mut noisy_records = Vec::new();

    for s in 0..40 {
        let p = offset_meters(&STATION, s as f64 * 22.0, 0.0);
        clean_records.extend(clean.process(&fix(p, 410.0, 22.0, s)));
        noisy_records.extend(noisy.process(&fix(p, 410.0, 22.0, s)));

        let mut bad = fix(offset_meters(&p, 80.0, 80.0), 900.0, 22.0, s);
        bad.accuracy_m = 65.0;
        assert!(noisy.process(&bad).is_empty());
    }
    assert_eq!(clean_records, noisy_records);
    assert_eq!(noisy.stats().noise_rejections, 40);
}

#[test]
fn climbing_line_reports_grade() {
    init();
    let mut tracker = Tracker::new();
    let mut records = Vec::new();
    // 2 % climb: 0.5 m up every 25 m
    for s in 0..50 {
        let p = offset_meters(&STATION, s as f64 * 25.0, 0.0);
        records.extend(tracker.process(&fix(p, 400.0 + s as f64 * 0.5, 25.0, s)));
    }
    assert!(records.len() >= 10);
    // Skip the first record, where the median window is still filling
    for record in &records[1..] {
        let grade = record.grade_percent.unwrap();
        assert!((grade - 2.0).abs() < 0.05, "grade {} on record {}", grade, record.index);
    }
}

#[test]
fn curve_of_known_radius() {
    init();
    let radius = 500.0;
    let center = offset_meters(&STATION, 0.0, -radius);
    // 101 m of arc per fix, so every fix crosses one threshold
    let step = 101.0 / radius;

    let mut tracker = Tracker::new();
    let mut records = Vec::new();
    for s in 0..12 {
        let angle = s as f64 * step;
        let p = offset_meters(&center, radius * angle.sin(), radius * angle.cos());
        records.extend(tracker.process(&fix(p, 410.0, 25.0, s * 4)));
    }

    assert_eq!(records.len(), 11);
    assert!(records[0].curve_radius_m.is_none());
    assert!(records[1].curve_radius_m.is_none());
    for record in &records[2..] {
        let r = record.curve_radius_m.unwrap();
        assert!((r - radius).abs() / radius < 0.05, "radius {}", r);
        let percent = record.curvature_percent.unwrap();
        assert!((percent - 100.0 / radius).abs() < 0.02);
    }
}

#[test]
fn polyline_is_decimated() {
    init();
    let mut tracker = Tracker::new();
    // 2 m per fix over 200 m; speed keeps it moving, drift gate keeps every 3rd
    for s in 0..100 {
        let p = offset_meters(&STATION, s as f64 * 2.0, 0.0);
        tracker.process(&fix(p, 410.0, 2.0, s));
    }
    let polyline = tracker.telemetry().polyline;
    assert!(polyline.len() > 10);
    for pair in polyline.windows(2) {
        assert!(haversine_distance(&pair[0], &pair[1]) >= 8.0 - 1e-6);
    }
}

#[test]
fn records_flow_into_a_store_and_out_as_csv() {
    init();
    let mut tracker = Tracker::new();
    let mut store = MemoryRecordStore::new();
    for s in 0..30 {
        let p = offset_meters(&STATION, s as f64 * 18.0, 0.0);
        tracker.process_into(&fix(p, 410.0, 18.0, s), &mut store).unwrap();
    }
    let records = store.load_all().unwrap();
    assert_eq!(records.len(), 5);

    let csv = export::to_csv_string(&records).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("index,timestamp,latitude"));
    assert!(lines[5].ends_with(",500.0"));
}

#[test]
fn restart_resumes_from_store() {
    init();
    let mut store = MemoryRecordStore::new();
    let mut tracker = Tracker::new();
    for s in 0..12 {
        let p = offset_meters(&STATION, s as f64 * 20.0, 0.0);
        tracker.process_into(&fix(p, 410.0, 20.0, s), &mut store).unwrap();
    }
    assert_eq!(store.count().unwrap(), 2);

    // App restarted further down the line
    let mut restarted = Tracker::with_config(TrackerConfig::default()).unwrap();
    restarted.resume_from_store(&store).unwrap();
    for s in 0..8 {
        let p = offset_meters(&STATION, 3000.0 + s as f64 * 20.0, 0.0);
        restarted.process_into(&fix(p, 410.0, 20.0, 100 + s), &mut store).unwrap();
    }

    let all = store.load_all().unwrap();
    let indices: Vec<u64> = all.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!(all[2].total_distance_m, 300.0);
}

#[cfg(feature = "persistence")]
#[test]
fn sqlite_store_survives_restart() {
    use trainlog::SqliteRecordStore;

    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journey.db");
    let path = path.to_str().unwrap();

    {
        let mut store = SqliteRecordStore::new(path).unwrap();
        let mut tracker = Tracker::new();
        for s in 0..12 {
            let p = offset_meters(&STATION, s as f64 * 20.0, 0.0);
            tracker.process_into(&fix(p, 410.0, 20.0, s), &mut store).unwrap();
        }
    }

    let store = SqliteRecordStore::new(path).unwrap();
    let mut tracker = Tracker::new();
    tracker.resume_from_store(&store).unwrap();
    assert_eq!(tracker.session().record_index(), 2);
    assert_eq!(tracker.session().next_log_threshold_m(), 300.0);
}
