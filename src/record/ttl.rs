//! TTL Evaluator
//!
//! Record liveness is computed at read time from the stored creation time
//! and TTL. Nothing ages out of the file on its own.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, SubsecRound, TimeDelta};
use serde::{Serialize, Serializer};

use crate::error::FlatKvError;

use super::Record;

/// Time to live of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Never expires
    #[default]
    Infinite,

    /// Expires once more than this many seconds have passed since creation
    Seconds(NonZeroU64),
}

impl Ttl {
    /// Sentinel spelling of an infinite TTL, both on disk and in text input
    pub const INFINITE: &'static str = "infinite";

    /// Build a finite TTL; zero and negative values are rejected
    pub fn seconds(secs: i64) -> Result<Self, FlatKvError> {
        u64::try_from(secs)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Ttl::Seconds)
            .ok_or_else(|| FlatKvError::TtlType(secs.to_string()))
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Ttl::Infinite)
    }
}

impl FromStr for Ttl {
    type Err = FlatKvError;

    /// Accepts `infinite` or a positive integer number of seconds
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::INFINITE {
            return Ok(Ttl::Infinite);
        }

        s.parse::<u64>()
            .ok()
            .and_then(NonZeroU64::new)
            .map(Ttl::Seconds)
            .ok_or_else(|| FlatKvError::TtlType(s.to_string()))
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Infinite => f.write_str(Self::INFINITE),
            Ttl::Seconds(secs) => write!(f, "{}", secs),
        }
    }
}

impl Serialize for Ttl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ttl::Infinite => serializer.serialize_str(Self::INFINITE),
            Ttl::Seconds(secs) => serializer.serialize_u64(secs.get()),
        }
    }
}

/// Whether `record` is still live at `now`
///
/// A record created at `t` with a TTL of `n` seconds is live up to and
/// including `t + n`; it expires only once the elapsed time is strictly
/// greater than `n`.
pub fn is_live(record: &Record, now: NaiveDateTime) -> bool {
    let secs = match record.ttl {
        Ttl::Infinite => return true,
        Ttl::Seconds(secs) => secs.get(),
    };

    // A TTL too large for a TimeDelta cannot elapse.
    let limit = match i64::try_from(secs).ok().and_then(TimeDelta::try_seconds) {
        Some(limit) => limit,
        None => return true,
    };

    now.signed_duration_since(record.created_time) <= limit
}

/// Source of the current time for stamping and expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub(super) fn truncate_to_seconds(time: NaiveDateTime) -> NaiveDateTime {
    time.trunc_subsecs(0)
}
