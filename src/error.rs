//! Error types for flatkv
//!
//! Provides a unified error type for all store operations.

use thiserror::Error;

use crate::record::DecodeError;

/// Result type alias using FlatKvError
pub type Result<T> = std::result::Result<T, FlatKvError>;

/// Unified error type for flatkv operations
#[derive(Debug, Error)]
pub enum FlatKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store File Errors
    // -------------------------------------------------------------------------
    #[error("Store corruption detected at line {line}: {source}")]
    Corruption {
        line: usize,
        #[source]
        source: DecodeError,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Guard Errors (create)
    // -------------------------------------------------------------------------
    #[error("Key must be a string, got {0}")]
    KeyType(String),

    #[error("Key length {len} exceeds the limit of {max} characters")]
    KeyLength { len: usize, max: usize },

    #[error("Key '{0}' is reserved for record metadata")]
    ReservedKey(String),

    #[error("Value is not valid JSON: {0}")]
    MalformedValue(#[source] serde_json::Error),

    #[error("TTL must be a positive integer or 'infinite', got '{0}'")]
    TtlType(String),

    #[error("Value size {size} bytes exceeds the limit of {max} bytes")]
    ValueSize { size: usize, max: usize },

    #[error("Store file size {size} bytes has reached the limit of {max} bytes")]
    FileSizeExceeded { size: u64, max: u64 },

    #[error("Key '{0}' already exists")]
    KeyExists(String),

    // -------------------------------------------------------------------------
    // Lookup Errors (read / delete)
    // -------------------------------------------------------------------------
    #[error("Key '{0}' does not exist")]
    KeyNotExist(String),

    #[error("Key '{0}' has expired")]
    TtlExpired(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
