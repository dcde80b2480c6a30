//! # flatkv
//!
//! A minimal persistent key-value store backed by a single flat file:
//! - One JSON record per line, insertion order, no header or index
//! - Create-once and delete; no update in place
//! - Per-record TTL checked at read time
//! - Guard limits on key length, value size and file size
//! - Exclusive locking across threads and processes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                               │
//! │              create / read / delete (one lock each)          │
//! └──────┬──────────────────────┬───────────────────────┬───────┘
//!        │                      │                       │
//!        ▼                      ▼                       ▼
//! ┌─────────────┐       ┌──────────────┐        ┌─────────────┐
//! │ GuardPolicy │       │  TTL (Clock) │        │  FileStore  │
//! │  (create)   │       │  read-time   │        │ scan/append │
//! └─────────────┘       └──────────────┘        │  /rewrite   │
//!                                               └──────┬──────┘
//!                                                      │
//!                                                      ▼
//!                                               ┌─────────────┐
//!                                               │ Record Codec│
//!                                               │ (JSON line) │
//!                                               └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod guard;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlatKvError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::Engine;
pub use record::{Clock, Record, SystemClock, Ttl};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of flatkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
