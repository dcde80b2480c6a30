//! Record Module
//!
//! The single entity stored by flatkv, its line encoding, and its liveness.
//!
//! ## Responsibilities
//! - Hold a key, a JSON value, a TTL and a creation timestamp
//! - Encode a record as one self-describing JSON line and decode it back
//! - Decide whether a record is still live at a given instant
//!
//! ## Line Format
//! ```text
//! {"<key>": <value>, "ttl": <seconds|"infinite">, "created_time": "YYYY-MM-DD HH:MM:SS"}
//! ```
//! One line per record, no header, no trailer. The line never contains an
//! embedded newline.

mod codec;
mod ttl;

pub use codec::{decode, encode, DecodeError, CREATED_TIME_FIELD, TIMESTAMP_FORMAT, TTL_FIELD};
pub use ttl::{is_live, Clock, SystemClock, Ttl};

use chrono::NaiveDateTime;
use serde_json::Value;

/// A single stored entry
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique key among the records present in the store file
    pub key: String,

    /// Arbitrary JSON document
    pub value: Value,

    /// Time to live, fixed at creation
    pub ttl: Ttl,

    /// Creation time with second resolution, fixed at creation
    pub created_time: NaiveDateTime,
}

impl Record {
    /// Create a record, truncating `created_time` to whole seconds
    pub fn new(
        key: impl Into<String>,
        value: Value,
        ttl: Ttl,
        created_time: NaiveDateTime,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            ttl,
            created_time: ttl::truncate_to_seconds(created_time),
        }
    }

    /// Whether this record is live at `now`
    pub fn is_live(&self, now: NaiveDateTime) -> bool {
        is_live(self, now)
    }

    /// Encode this record as a single line (without terminator)
    pub fn encode(&self) -> serde_json::Result<String> {
        encode(self)
    }
}
