//! Shared helpers for engine tests

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use flatkv::{Clock, Config, Engine};
use parking_lot::Mutex;
use tempfile::TempDir;

/// A clock that only moves when told to
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: &str) -> Arc<Self> {
        let now = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.now.lock() += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

pub fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(temp_dir.path()).unwrap();
    (temp_dir, engine)
}

pub fn setup_engine_with_clock(config: Config) -> (Engine, Arc<ManualClock>) {
    let clock = ManualClock::new("2019-09-14 10:00:00");
    let engine = Engine::with_clock(config, clock.clone()).unwrap();
    (engine, clock)
}

pub fn setup_temp_engine_with_clock() -> (TempDir, Engine, Arc<ManualClock>) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let (engine, clock) = setup_engine_with_clock(config);
    (temp_dir, engine, clock)
}
