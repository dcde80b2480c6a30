//! Store Lock
//!
//! Two-level exclusive lock around the store file:
//! an in-process mutex for threads sharing one `FileStore`, and an
//! advisory OS lock on a sibling `.lock` file for other handles and
//! processes. The lock file is never renamed, so the OS lock stays valid
//! while delete swaps the store file underneath it.

use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;
use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;

/// Held exclusive access to a store. Released on drop.
pub struct StoreLock<'a> {
    lock_file: File,
    _guard: MutexGuard<'a, ()>,
}

impl<'a> StoreLock<'a> {
    /// Block until both the in-process mutex and the OS lock are held
    pub(super) fn acquire(mutex: &'a Mutex<()>, lock_path: &Path) -> Result<Self> {
        let guard = mutex.lock();

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path)?;
        FileExt::lock_exclusive(&lock_file)?;

        tracing::trace!(path = %lock_path.display(), "store lock acquired");

        Ok(Self {
            lock_file,
            _guard: guard,
        })
    }
}

impl Drop for StoreLock<'_> {
    fn drop(&mut self) {
        // Runs before the mutex guard field is dropped.
        if let Err(e) = FileExt::unlock(&self.lock_file) {
            tracing::warn!("failed to release store lock: {}", e);
        }
    }
}
