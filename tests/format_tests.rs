use rworkclock::models::attendance::{AttendanceRecord, CheckOutReceipt};
use rworkclock::utils::time::{MAX_TOTAL_SECONDS, format_elapsed, hours_to_seconds, sanitize_seconds};

#[test]
fn test_format_elapsed_known_values() {
    assert_eq!(format_elapsed(0), "0:00:00");
    assert_eq!(format_elapsed(59), "0:00:59");
    assert_eq!(format_elapsed(60), "0:01:00");
    assert_eq!(format_elapsed(3599), "0:59:59");
    assert_eq!(format_elapsed(3661), "1:01:01");
    assert_eq!(format_elapsed(10861), "3:01:01");
    // hours are never padded nor wrapped
    assert_eq!(format_elapsed(100 * 3600 + 5), "100:00:05");
}

#[test]
fn test_format_elapsed_shape() {
    for total in (0..200_000u64).step_by(997) {
        let s = format_elapsed(total);
        let parts: Vec<&str> = s.split(':').collect();
        assert_eq!(parts.len(), 3, "bad shape: {}", s);
        assert!(!parts[0].is_empty());
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 2);

        let h: u64 = parts[0].parse().unwrap();
        let m: u64 = parts[1].parse().unwrap();
        let sec: u64 = parts[2].parse().unwrap();
        assert!(m <= 59 && sec <= 59);
        assert_eq!(h * 3600 + m * 60 + sec, total);
    }
}

#[test]
fn test_hours_conversion_is_a_single_floor_to_seconds() {
    assert_eq!(hours_to_seconds(0.0), Some(0));
    assert_eq!(hours_to_seconds(2.0), Some(7200));
    assert_eq!(hours_to_seconds(0.5), Some(1800));
    // 3661 s expressed in hours with float noise
    assert_eq!(hours_to_seconds(3661.0 / 3600.0), Some(3661));
    assert_eq!(hours_to_seconds(1.0169444), Some(3661));
    assert_eq!(hours_to_seconds(-1.0), None);
    assert_eq!(hours_to_seconds(f64::NAN), None);
    assert_eq!(hours_to_seconds(f64::INFINITY), None);
}

#[test]
fn test_sanitize_seconds() {
    assert_eq!(sanitize_seconds(5000.0), Some(5000));
    assert_eq!(sanitize_seconds(5000.9), Some(5000));
    assert_eq!(sanitize_seconds(-0.5), None);
    assert_eq!(sanitize_seconds(f64::NAN), None);
}

#[test]
fn test_out_of_range_totals_are_absent() {
    let limit = MAX_TOTAL_SECONDS as f64;
    assert_eq!(sanitize_seconds(limit), Some(MAX_TOTAL_SECONDS));
    assert_eq!(sanitize_seconds(limit + 1.0), None);
    assert_eq!(sanitize_seconds(1e20), None);
    assert_eq!(hours_to_seconds(1e18), None);
    assert_eq!(hours_to_seconds(limit / 3600.0), Some(MAX_TOTAL_SECONDS));

    let json = r#"{"accumulatedSeconds": 1e20, "accumulatedHours": 2}"#;
    let receipt: CheckOutReceipt = serde_json::from_str(json).unwrap();
    assert_eq!(receipt.accumulated_total(), Some(7200));
}

#[test]
fn test_record_total_prefers_seconds_then_hours() {
    let json = r#"{"accumulatedSeconds": 5000, "accumulatedHours": 9.0, "isActive": false}"#;
    let record: AttendanceRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.accumulated_total(), Some(5000));

    let json = r#"{"accumulatedHours": "1.5", "isActive": true,
                   "activeSessionStartTime": "2025-03-10T09:00:00Z"}"#;
    let record: AttendanceRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.accumulated_total(), Some(5400));
    assert!(record.is_active);
    assert!(record.active_session_start_time.is_some());
}

#[test]
fn test_malformed_totals_are_absent() {
    let json = r#"{"accumulatedSeconds": "lots", "accumulatedHours": null}"#;
    let receipt: CheckOutReceipt = serde_json::from_str(json).unwrap();
    assert_eq!(receipt.accumulated_total(), None);

    let json = r#"{"accumulatedSeconds": -20}"#;
    let receipt: CheckOutReceipt = serde_json::from_str(json).unwrap();
    assert_eq!(receipt.accumulated_total(), None);

    // bad seconds fall back to a usable hours field
    let json = r#"{"accumulatedSeconds": [1, 2], "accumulatedHours": 1}"#;
    let receipt: CheckOutReceipt = serde_json::from_str(json).unwrap();
    assert_eq!(receipt.accumulated_total(), Some(3600));

    let json = r#"{"isActive": true, "activeSessionStartTime": "yesterday-ish"}"#;
    let record: AttendanceRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.active_session_start_time, None);
    assert_eq!(record.accumulated_total(), None);
}
