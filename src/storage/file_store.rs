//! File Store
//!
//! Owns the store file: linear scans, appends, and rewrite-and-swap.
//!
//! ## Concurrency:
//! - Mutations take a `&StoreLock` witness so callers can hold one lock
//!   across scan, decision and write.
//! - `append` and `rewrite_excluding` are convenience wrappers that take
//!   the lock themselves.
//! - Scans never lock; callers that need a stable view lock first.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Split, Write};
use std::iter::Enumerate;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::{Config, SyncStrategy};
use crate::error::{FlatKvError, Result};
use crate::record::{self, DecodeError, Record};

use super::StoreLock;

/// Handle to a single store file
pub struct FileStore {
    /// The store file
    path: PathBuf,

    /// Sibling file carrying the OS advisory lock
    lock_path: PathBuf,

    /// Whether writes are fsynced
    sync_strategy: SyncStrategy,

    /// Serializes lock holders within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    const SCRATCH_PREFIX: &'static str = ".flatkv-";
    const SCRATCH_SUFFIX: &'static str = ".tmp";

    /// Open the store described by `config`
    ///
    /// Creates the data directory and an empty store file when missing.
    pub fn open(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let path = config.store_path();
        OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::debug!(path = %path.display(), "store file opened");

        Ok(Self {
            path,
            lock_path: config.lock_path(),
            sync_strategy: config.sync_strategy,
            write_lock: Mutex::new(()),
        })
    }

    /// Take exclusive access to the store
    pub fn lock(&self) -> Result<StoreLock<'_>> {
        StoreLock::acquire(&self.write_lock, &self.lock_path)
    }

    /// Lazily decode every record, in file order
    ///
    /// Each call starts a fresh pass from the beginning of the file. The
    /// iterator stops after the first error.
    pub fn scan_all(&self) -> Result<RecordIter> {
        let file = File::open(&self.path)?;
        Ok(RecordIter {
            lines: BufReader::new(file).split(b'\n').enumerate(),
            done: false,
        })
    }

    /// Whether any record in the file carries `key`, expired or not
    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.find(key)?.is_some())
    }

    /// Find the record carrying `key`
    ///
    /// The whole file is always decoded, so a corrupt line anywhere fails
    /// the lookup even when the key was already seen.
    pub fn find(&self, key: &str) -> Result<Option<Record>> {
        let mut found = None;
        for record in self.scan_all()? {
            let record = record?;
            if found.is_none() && record.key == key {
                found = Some(record);
            }
        }

        tracing::debug!(key, found = found.is_some(), "scanned store");
        Ok(found)
    }

    /// Number of records in the file
    pub fn len(&self) -> Result<usize> {
        self.scan_all()?.try_fold(0, |n, record| record.map(|_| n + 1))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Current size of the store file, in bytes
    pub fn size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, taking the lock for the duration
    pub fn append(&self, record: &Record) -> Result<()> {
        let lock = self.lock()?;
        self.append_locked(&lock, record)
    }

    /// Append one record while `_lock` is held
    pub fn append_locked(&self, _lock: &StoreLock<'_>, record: &Record) -> Result<()> {
        let mut line = record
            .encode()
            .map_err(|e| FlatKvError::Serialization(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_data()?;
        }

        tracing::debug!(key = %record.key, bytes = line.len(), "record appended");
        Ok(())
    }

    /// Rewrite the store without `key`, taking the lock for the duration
    pub fn rewrite_excluding(&self, key: &str) -> Result<usize> {
        let lock = self.lock()?;
        self.rewrite_excluding_locked(&lock, key)
    }

    /// Rewrite the store without `key` while `_lock` is held
    ///
    /// Surviving lines are copied byte for byte into a scratch file in the
    /// same directory, which is then renamed over the store file. On any
    /// failure the scratch file is removed and the store file is untouched.
    /// Returns the number of lines dropped.
    pub fn rewrite_excluding_locked(&self, _lock: &StoreLock<'_>, key: &str) -> Result<usize> {
        let dir = self.dir();
        let mut scratch = tempfile::Builder::new()
            .prefix(Self::SCRATCH_PREFIX)
            .suffix(Self::SCRATCH_SUFFIX)
            .tempfile_in(dir)?;

        let mut removed = 0;
        {
            let source = BufReader::new(File::open(&self.path)?);
            let mut writer = BufWriter::new(scratch.as_file_mut());

            for (index, line) in source.split(b'\n').enumerate() {
                let line = line?;
                let record = decode_line(index, &line)?;
                if record.key == key {
                    removed += 1;
                    continue;
                }
                writer.write_all(&line)?;
                writer.write_all(b"\n")?;
            }

            writer.flush()?;
        }

        fs::set_permissions(scratch.path(), fs::metadata(&self.path)?.permissions())?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            scratch.as_file().sync_all()?;
        }

        scratch
            .persist(&self.path)
            .map_err(|e| FlatKvError::Io(e.error))?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            sync_dir(dir)?;
        }

        tracing::debug!(key, removed, "store file rewritten");
        Ok(removed)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Iterator over the records of a store file
pub struct RecordIter {
    lines: Enumerate<Split<BufReader<File>>>,
    done: bool,
}

impl Iterator for RecordIter {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let (index, line) = self.lines.next()?;
        let result = line
            .map_err(FlatKvError::from)
            .and_then(|line| decode_line(index, &line));

        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Decode one raw line; bad UTF-8 is reported like any other damaged line
fn decode_line(index: usize, line: &[u8]) -> Result<Record> {
    std::str::from_utf8(line)
        .map_err(DecodeError::from)
        .and_then(record::decode)
        .map_err(|source| {
            tracing::warn!(line = index + 1, "corrupt record: {}", source);
            FlatKvError::Corruption {
                line: index + 1,
                source,
            }
        })
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
