//! Configuration for flatkv
//!
//! Centralized configuration with sensible defaults. The store location is
//! carried here and handed to the engine at construction; there is no
//! process-wide default path.

use std::path::{Path, PathBuf};

use crate::error::{FlatKvError, Result};

/// Main configuration for a flatkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Location
    // -------------------------------------------------------------------------
    /// Directory holding the store file and its lock file
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── datastore.txt       (one JSON record per line)
    ///     └── datastore.txt.lock  (advisory lock, never holds data)
    pub data_dir: PathBuf,

    /// Name of the store file inside `data_dir`
    pub file_name: String,

    // -------------------------------------------------------------------------
    // Guard Limits
    // -------------------------------------------------------------------------
    /// Max key length, in characters
    pub max_key_len: usize,

    /// Max serialized value size (in bytes)
    pub max_value_bytes: usize,

    /// Store file size at which creates are refused (in bytes)
    pub max_file_bytes: u64,

    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------
    /// Sync strategy: whether writes are fsynced before returning
    pub sync_strategy: SyncStrategy,
}

/// Store sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every append and before every rewrite swap
    EveryWrite,

    /// Leave flushing to the operating system
    OsManaged,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_name: Config::DEFAULT_FILE_NAME.to_string(),
            max_key_len: 32,
            max_value_bytes: 16 * 1024,         // 16 KiB
            max_file_bytes: 1024 * 1024 * 1024, // 1 GiB
            sync_strategy: SyncStrategy::EveryWrite,
        }
    }
}

impl Config {
    /// Store file name used when none is configured
    pub const DEFAULT_FILE_NAME: &'static str = "datastore.txt";

    const LOCK_SUFFIX: &'static str = ".lock";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the store file
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Full path of the sibling lock file
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", self.file_name, Self::LOCK_SUFFIX))
    }

    /// Check that the configuration describes a usable store
    pub fn validate(&self) -> Result<()> {
        if self.file_name.is_empty() {
            return Err(FlatKvError::Config("file_name must not be empty".into()));
        }

        let name = Path::new(&self.file_name);
        if name.components().count() != 1 || name.file_name().is_none() {
            return Err(FlatKvError::Config(format!(
                "file_name must be a plain file name, got '{}'",
                self.file_name
            )));
        }

        if self.max_key_len == 0 {
            return Err(FlatKvError::Config("max_key_len must be at least 1".into()));
        }
        if self.max_value_bytes == 0 {
            return Err(FlatKvError::Config(
                "max_value_bytes must be at least 1".into(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(FlatKvError::Config(
                "max_file_bytes must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (holds the store file)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the store file name
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    /// Set the maximum key length (in characters)
    pub fn max_key_len(mut self, len: usize) -> Self {
        self.config.max_key_len = len;
        self
    }

    /// Set the maximum serialized value size (in bytes)
    pub fn max_value_bytes(mut self, size: usize) -> Self {
        self.config.max_value_bytes = size;
        self
    }

    /// Set the store file size ceiling (in bytes)
    pub fn max_file_bytes(mut self, size: u64) -> Self {
        self.config.max_file_bytes = size;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
