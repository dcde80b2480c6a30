//! Guard Policy
//!
//! The ordered checks a create must pass before anything is written.
//! First failure wins:
//!
//! 1. key is a string
//! 2. key length
//! 3. value parses as JSON
//! 4. ttl is `infinite` or a positive integer
//! 5. serialized value size
//! 6. key not already present (expired records count)
//! 7. store file below its size ceiling
//!
//! Steps 6 and 7 need the store, so the engine runs them under its lock
//! through [`GuardPolicy::check_absent`] and [`GuardPolicy::check_file_size`].

use serde_json::Value;

use crate::config::Config;
use crate::error::{FlatKvError, Result};
use crate::record::{Ttl, CREATED_TIME_FIELD, TTL_FIELD};

/// Limits enforced on create
#[derive(Debug, Clone, Copy)]
pub struct GuardPolicy {
    max_key_len: usize,
    max_value_bytes: usize,
    max_file_bytes: u64,
}

impl GuardPolicy {
    pub fn new(config: &Config) -> Self {
        Self {
            max_key_len: config.max_key_len,
            max_value_bytes: config.max_value_bytes,
            max_file_bytes: config.max_file_bytes,
        }
    }

    /// Step 1: accept only string keys from structured input
    pub fn check_key_type(key: &Value) -> Result<&str> {
        match key {
            Value::String(key) => Ok(key.as_str()),
            Value::Null => Err(FlatKvError::KeyType("null".into())),
            Value::Bool(_) => Err(FlatKvError::KeyType("boolean".into())),
            Value::Number(_) => Err(FlatKvError::KeyType("number".into())),
            Value::Array(_) => Err(FlatKvError::KeyType("array".into())),
            Value::Object(_) => Err(FlatKvError::KeyType("object".into())),
        }
    }

    /// Step 2: key length in characters, then reserved names
    pub fn check_key(&self, key: &str) -> Result<()> {
        let len = key.chars().count();
        if len > self.max_key_len {
            return Err(FlatKvError::KeyLength {
                len,
                max: self.max_key_len,
            });
        }

        if key == TTL_FIELD || key == CREATED_TIME_FIELD {
            return Err(FlatKvError::ReservedKey(key.to_string()));
        }

        Ok(())
    }

    /// Step 3: parse the textual value
    pub fn parse_value(raw: &str) -> Result<Value> {
        serde_json::from_str(raw).map_err(FlatKvError::MalformedValue)
    }

    /// Step 4: parse an optional textual ttl, defaulting to infinite
    pub fn parse_ttl(raw: Option<&str>) -> Result<Ttl> {
        raw.map_or(Ok(Ttl::Infinite), str::parse)
    }

    /// Step 5: size of the value once serialized
    pub fn check_value_size(&self, value: &Value) -> Result<usize> {
        let size = serde_json::to_vec(value)
            .map_err(|e| FlatKvError::Serialization(e.to_string()))?
            .len();

        if size > self.max_value_bytes {
            return Err(FlatKvError::ValueSize {
                size,
                max: self.max_value_bytes,
            });
        }

        Ok(size)
    }

    /// Step 6: the key must not be present in the file
    pub fn check_absent(key: &str, exists: bool) -> Result<()> {
        if exists {
            return Err(FlatKvError::KeyExists(key.to_string()));
        }
        Ok(())
    }

    /// Step 7: the store file must be strictly below the ceiling
    pub fn check_file_size(&self, size: u64) -> Result<()> {
        if size >= self.max_file_bytes {
            return Err(FlatKvError::FileSizeExceeded {
                size,
                max: self.max_file_bytes,
            });
        }
        Ok(())
    }
}
