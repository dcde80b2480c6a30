//! Storage Module
//!
//! Persistent storage in a single flat file.
//!
//! ## Responsibilities
//! - Create the store file on open
//! - Full linear scans, decoded one line at a time
//! - Append for create, rewrite-and-swap for delete
//! - Exclusive locking shared by threads and processes
//!
//! ## File Layout
//! ```text
//! {data_dir}/
//! ├── datastore.txt         one encoded record per line, insertion order
//! ├── datastore.txt.lock    advisory lock target
//! └── .flatkv-XXXX.tmp      scratch file, only while a delete is running
//! ```

mod file_store;
mod lock;

pub use file_store::{FileStore, RecordIter};
pub use lock::StoreLock;
