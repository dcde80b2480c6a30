//! Record Codec
//!
//! Encodes a record as one JSON object per line and decodes it back.
//! The user key shares the object with two metadata fields, so the object
//! always holds exactly three members.

use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{Record, Ttl};

/// Metadata member holding the TTL
pub const TTL_FIELD: &str = "ttl";

/// Metadata member holding the creation timestamp
pub const CREATED_TIME_FIELD: &str = "created_time";

/// On-disk timestamp layout, second resolution
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Why a stored line could not be turned back into a record
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("line is not a JSON object")]
    NotAnObject,

    #[error("missing '{0}' field")]
    MissingField(&'static str),

    #[error("expected exactly one record key, found {0}")]
    KeyCount(usize),

    #[error("invalid ttl: {0}")]
    InvalidTtl(Value),

    #[error("invalid created_time: {0}")]
    InvalidTimestamp(Value),
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let created_time = self.created_time.format(TIMESTAMP_FORMAT).to_string();

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.serialize_entry(TTL_FIELD, &self.ttl)?;
        map.serialize_entry(CREATED_TIME_FIELD, &created_time)?;
        map.end()
    }
}

/// Encode a record as a single line, without the line terminator
///
/// Compact JSON escapes control characters inside strings, so the result
/// never contains a raw newline.
pub fn encode(record: &Record) -> serde_json::Result<String> {
    serde_json::to_string(record)
}

/// Decode one stored line
pub fn decode(line: &str) -> Result<Record, DecodeError> {
    let mut object: Map<String, Value> = match serde_json::from_str::<Value>(line)? {
        Value::Object(object) => object,
        _ => return Err(DecodeError::NotAnObject),
    };

    let ttl = object
        .remove(TTL_FIELD)
        .ok_or(DecodeError::MissingField(TTL_FIELD))
        .and_then(decode_ttl)?;

    let created_time = object
        .remove(CREATED_TIME_FIELD)
        .ok_or(DecodeError::MissingField(CREATED_TIME_FIELD))
        .and_then(decode_timestamp)?;

    if object.len() != 1 {
        return Err(DecodeError::KeyCount(object.len()));
    }

    let (key, value) = match object.into_iter().next() {
        Some(entry) => entry,
        None => return Err(DecodeError::KeyCount(0)),
    };

    Ok(Record {
        key,
        value,
        ttl,
        created_time,
    })
}

fn decode_ttl(raw: Value) -> Result<Ttl, DecodeError> {
    let ttl = match &raw {
        Value::String(s) if s == Ttl::INFINITE => Some(Ttl::Infinite),
        Value::Number(n) => n
            .as_u64()
            .and_then(std::num::NonZeroU64::new)
            .map(Ttl::Seconds),
        _ => None,
    };

    ttl.ok_or(DecodeError::InvalidTtl(raw))
}

fn decode_timestamp(raw: Value) -> Result<NaiveDateTime, DecodeError> {
    let parsed = match &raw {
        Value::String(s) => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok(),
        _ => None,
    };

    parsed.ok_or(DecodeError::InvalidTimestamp(raw))
}
