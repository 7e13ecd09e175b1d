//! Time sources for revision managers
//!
//! Managers stamp `started_at`/`ended_at` from a `Clock`. Production code
//! uses `SystemClock`; tests inject a `ManualClock` to get deterministic,
//! distinct timestamps.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use strata_immutable_core::Timestamp;

/// Source of revision timestamps
pub trait Clock: Send + Sync {
    /// The current time
    fn now(&self) -> Timestamp;
}

/// Wall clock that never runs backwards
///
/// System time can step back (NTP adjustments); readings are clamped to the
/// last value handed out.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Mutex<Timestamp>,
}

impl SystemClock {
    /// Create a system clock
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let mut last = self.last.lock();
        let now = Timestamp::now().max(*last);
        *last = now;
        now
    }
}

/// Manually driven clock for tests
///
/// Every reading returns the current value and then advances it by `step`
/// (zero unless set with `with_step`).
#[derive(Debug)]
pub struct ManualClock {
    micros: AtomicU64,
    step: u64,
}

impl ManualClock {
    /// Clock frozen at `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            micros: AtomicU64::new(start.as_micros()),
            step: 0,
        }
    }

    /// Advance by `step` after every reading
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step.as_micros() as u64;
        self
    }

    /// Jump to `ts`
    pub fn set(&self, ts: Timestamp) {
        self.micros.store(ts.as_micros(), Ordering::SeqCst);
    }

    /// Move forward by `by`
    pub fn advance(&self, by: Duration) {
        self.micros
            .fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }

    /// Current value, without advancing
    pub fn peek(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.fetch_add(self.step, Ordering::SeqCst))
    }
}
