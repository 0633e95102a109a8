use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use obc_dispatch::utils::time::{advance, from_storage, now, parse_datetime, to_storage};

#[test]
fn test_parse_datetime_valid() {
    let input = "2024-01-01T12:00:00Z";
    let result = parse_datetime(input);
    assert!(result.is_some());
    let dt: DateTime<Utc> = result.unwrap();
    assert_eq!(dt.to_rfc3339(), "2024-01-01T12:00:00+00:00");
}

#[test]
fn test_parse_datetime_invalid() {
    assert!(parse_datetime("invalid date").is_none());
    assert!(parse_datetime("").is_none());
}

#[test]
fn test_parse_datetime_different_formats() {
    let inputs = vec![
        "2024-01-01T12:00:00+00:00",
        "2024-01-01T12:00:00-05:00",
        "2024-01-01 12:00:00",
        "2024-01-01 12:00",
        "2024-01-01",
    ];

    for input in inputs {
        let result = parse_datetime(input);
        assert!(result.is_some(), "Failed to parse: {}", input);
    }
}

#[test]
fn test_parse_date_only_is_midnight() {
    let dt = parse_datetime("2024-03-05").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap());
}

#[test]
fn test_now_has_microsecond_precision() {
    assert_eq!(now().nanosecond() % 1_000, 0);
}

#[test]
fn test_advance_is_strictly_later() {
    let future = Utc::now() + Duration::hours(1);
    let next = advance(future);
    assert!(next > future);
    assert_eq!(next - future, Duration::microseconds(1));

    let past = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    assert!(advance(past) > past);
}

#[test]
fn test_storage_roundtrip_preserves_microseconds() {
    let ts = now();
    let stored = to_storage(&ts);
    assert!(stored.ends_with('Z'));
    assert_eq!(from_storage(&stored).unwrap(), ts);
}

#[test]
fn test_from_storage_rejects_garbage() {
    assert!(from_storage("yesterday").is_err());
}
