//! Tests for the record line codec
//!
//! These tests verify:
//! - Records survive encode → decode unchanged
//! - The line layout matches the documented format
//! - Malformed lines are rejected with a precise DecodeError

use chrono::NaiveDateTime;
use flatkv::record::{decode, encode, DecodeError, Record, Ttl};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn record(key: &str, value: Value, ttl: Ttl) -> Record {
    Record::new(key, value, ttl, at("2019-09-14 10:30:00"))
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_layout() {
    let rec = record("krishna", json!({"name": "Kirsty", "age": 34}), Ttl::Infinite);

    let line = encode(&rec).unwrap();

    assert_eq!(
        line,
        r#"{"krishna":{"name":"Kirsty","age":34},"ttl":"infinite","created_time":"2019-09-14 10:30:00"}"#
    );
}

#[test]
fn test_encode_finite_ttl_as_number() {
    let rec = record("gopal", json!(1), Ttl::seconds(12).unwrap());

    let line = encode(&rec).unwrap();

    assert!(line.contains(r#""ttl":12"#));
}

#[test]
fn test_encode_has_no_newline() {
    let rec = record("multi", json!("first\nsecond\r\nthird"), Ttl::Infinite);

    let line = encode(&rec).unwrap();

    assert!(!line.contains('\n'));
    assert!(!line.contains('\r'));
    assert_eq!(decode(&line).unwrap(), rec);
}

#[test]
fn test_new_truncates_subseconds() {
    let precise = at("2020-01-01 00:00:05") + chrono::TimeDelta::milliseconds(750);

    let rec = Record::new("k", json!(null), Ttl::Infinite, precise);

    assert_eq!(rec.created_time, at("2020-01-01 00:00:05"));
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_round_trip_preserves_value_types() {
    let values = [
        json!({"nested": {"list": [1, 2.5, "three", false, null]}}),
        json!([1, [2, [3]]]),
        json!(-42),
        json!(3.141592653589793),
        json!("plain string"),
        json!(true),
        json!(null),
        json!({}),
    ];

    for value in values {
        let rec = record("k", value, Ttl::seconds(60).unwrap());
        let decoded = decode(&encode(&rec).unwrap()).unwrap();
        assert_eq!(decoded, rec);
    }
}

#[test]
fn test_round_trip_preserves_object_member_order() {
    let rec = record("k", json!({"z": 1, "a": 2, "m": 3}), Ttl::Infinite);

    let decoded = decode(&encode(&rec).unwrap()).unwrap();

    let keys: Vec<&String> = decoded.value.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn test_round_trip_unicode_key() {
    let rec = record("ключ-🔑", json!({"v": "значение"}), Ttl::Infinite);

    assert_eq!(decode(&encode(&rec).unwrap()).unwrap(), rec);
}

// =============================================================================
// Decoding Error Tests
// =============================================================================

#[test]
fn test_decode_invalid_json() {
    let err = decode(r#"{"k": 1, "ttl": "#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_decode_not_an_object() {
    let err = decode("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, DecodeError::NotAnObject));
}

#[test]
fn test_decode_missing_ttl() {
    let err = decode(r#"{"k": 1, "created_time": "2019-09-14 10:30:00"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField("ttl")));
}

#[test]
fn test_decode_missing_created_time() {
    let err = decode(r#"{"k": 1, "ttl": 5}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField("created_time")));
}

#[test]
fn test_decode_rejects_bad_ttl() {
    for ttl in [r#""forever""#, "0", "-3", "1.5", "null"] {
        let line = format!(
            r#"{{"k": 1, "ttl": {}, "created_time": "2019-09-14 10:30:00"}}"#,
            ttl
        );
        let err = decode(&line).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTtl(_)), "ttl {}", ttl);
    }
}

#[test]
fn test_decode_rejects_bad_timestamp() {
    let err = decode(r#"{"k": 1, "ttl": 5, "created_time": "14/09/2019"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidTimestamp(_)));

    let err = decode(r#"{"k": 1, "ttl": 5, "created_time": 1568457000}"#).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidTimestamp(_)));
}

#[test]
fn test_decode_requires_exactly_one_key() {
    let err = decode(r#"{"ttl": 5, "created_time": "2019-09-14 10:30:00"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::KeyCount(0)));

    let err = decode(r#"{"a": 1, "b": 2, "ttl": 5, "created_time": "2019-09-14 10:30:00"}"#)
        .unwrap_err();
    assert!(matches!(err, DecodeError::KeyCount(2)));
}

#[test]
fn test_decode_accepts_any_member_order() {
    let rec = decode(r#"{"created_time": "2019-09-14 10:30:00", "ttl": 7, "k": [true]}"#).unwrap();

    assert_eq!(rec.key, "k");
    assert_eq!(rec.value, json!([true]));
    assert_eq!(rec.ttl, Ttl::seconds(7).unwrap());
    assert_eq!(rec.created_time, at("2019-09-14 10:30:00"));
}
