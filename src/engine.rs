//! Engine Module
//!
//! The store's public operations, composed from the file store, the
//! guard policy and the TTL evaluator.
//!
//! ## Responsibilities
//! - Run the guard policy before every create
//! - Stamp creation time from the configured clock
//! - Distinguish absent keys from expired ones on read/delete
//! - Hold the store lock across each operation's scan, decision and write

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::{FlatKvError, Result};
use crate::guard::GuardPolicy;
use crate::record::{Clock, Record, SystemClock, Ttl};
use crate::storage::FileStore;

/// The main storage engine
///
/// ## Concurrency Model: one lock per operation
///
/// Every `create`, `read` and `delete` holds the store lock from its first
/// scan to its last write, so no other engine (in this process or another)
/// can slip a write between the existence check and the mutation.
/// `exists`, `scan_all` and `len` read without locking.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The store file
    store: FileStore,

    /// Limits checked on create
    guard: GuardPolicy,

    /// Time source for stamping and expiry
    clock: Arc<dyn Clock>,
}

impl Engine {
    /// Open or create a store with the given config
    pub fn open(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Open or create a store that reads time from `clock`
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let store = FileStore::open(&config)?;
        let guard = GuardPolicy::new(&config);

        tracing::info!(
            path = %store.path().display(),
            bytes = store.size()?,
            "store opened"
        );

        Ok(Self {
            config,
            store,
            guard,
            clock,
        })
    }

    /// Create a record from typed input
    ///
    /// Fails if the key is too long or reserved, the value too large, the
    /// key already present (expired or not), or the store file full.
    pub fn create(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        self.guard.check_key(key)?;
        self.insert(key, value, ttl)
    }

    /// Create a record from textual value and ttl
    ///
    /// `raw_ttl` of `None` means infinite. Checks run in guard order, so a
    /// bad key is reported before a malformed value, which is reported
    /// before a malformed ttl.
    pub fn create_raw(&self, key: &str, raw_value: &str, raw_ttl: Option<&str>) -> Result<()> {
        self.guard.check_key(key)?;
        let value = GuardPolicy::parse_value(raw_value)?;
        let ttl = GuardPolicy::parse_ttl(raw_ttl)?;
        self.insert(key, value, ttl)
    }

    /// Create a record whose key comes from structured input
    ///
    /// Non-string keys are rejected, never coerced.
    pub fn create_json_key(&self, key: &Value, value: Value, ttl: Ttl) -> Result<()> {
        let key = GuardPolicy::check_key_type(key)?;
        self.create(key, value, ttl)
    }

    /// Read the value stored under `key`
    pub fn read(&self, key: &str) -> Result<Value> {
        let _lock = self.store.lock()?;
        let record = self.live_record(key)?;
        Ok(record.value)
    }

    /// Delete the record stored under `key`
    ///
    /// Expired records cannot be deleted; they stay in the file.
    pub fn delete(&self, key: &str) -> Result<()> {
        let lock = self.store.lock()?;
        self.live_record(key)?;

        let removed = self.store.rewrite_excluding_locked(&lock, key)?;
        tracing::info!(key, removed, "record deleted");
        Ok(())
    }

    /// Whether `key` is present in the file, expired or not
    pub fn exists(&self, key: &str) -> Result<bool> {
        self.store.exists(key)
    }

    /// Every record in the file, in insertion order, expired ones included
    pub fn scan_all(&self) -> Result<Vec<Record>> {
        self.store.scan_all()?.collect()
    }

    /// Number of records in the file
    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Guard steps 5 to 7 and the append, all under one lock
    fn insert(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        let size = self.guard.check_value_size(&value)?;

        let lock = self.store.lock()?;
        GuardPolicy::check_absent(key, self.store.exists(key)?)?;
        self.guard.check_file_size(self.store.size()?)?;

        let record = Record::new(key, value, ttl, self.clock.now());
        self.store.append_locked(&lock, &record)?;

        tracing::info!(key, %ttl, value_bytes = size, "record created");
        Ok(())
    }

    /// Look up `key`, deciding absence before liveness
    fn live_record(&self, key: &str) -> Result<Record> {
        let record = self
            .store
            .find(key)?
            .ok_or_else(|| FlatKvError::KeyNotExist(key.to_string()))?;

        if !record.is_live(self.clock.now()) {
            tracing::debug!(key, ttl = %record.ttl, "record expired");
            return Err(FlatKvError::TtlExpired(key.to_string()));
        }

        Ok(record)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the store file path
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Current size of the store file, in bytes
    pub fn size(&self) -> Result<u64> {
        self.store.size()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
