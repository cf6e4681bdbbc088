// src/clock.rs
//
// Time provider seam for the lock gate. The gate never reads the wall
// clock directly; it is constructed over anything implementing `Clock`,
// so tests and trace replay can script time instead of sleeping.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of the current instant, in milliseconds.
///
/// Readings must be monotonically non-decreasing. The gate compares
/// readings by subtraction to get elapsed milliseconds; nothing else is
/// required of an implementation.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real monotonic clock. Reports milliseconds since its construction,
/// backed by `std::time::Instant`, so readings never go backwards.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Manually driven clock for trace replay and tests.
///
/// Clones share the underlying time value, so a caller can hand one
/// handle to the gate and keep another to advance time between samples.
/// Single-threaded, like the gate itself.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    current_ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(ms: u64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Set the current time to an absolute value.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advance the current time by `ms`.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

/// Test double returning a pre-programmed sequence of instants, one per
/// `now_ms` call. Once the script runs out, the last value repeats.
///
/// # Panics
///
/// `new` panics if the script is empty; the clock must always have a
/// value to return.
#[derive(Debug, Clone)]
pub struct ScriptedClock {
    next_idx: Rc<Cell<usize>>,
    instants: Rc<Vec<u64>>,
}

impl ScriptedClock {
    pub fn new(instants: Vec<u64>) -> Self {
        assert!(!instants.is_empty(), "script must contain at least one instant");
        Self {
            next_idx: Rc::new(Cell::new(0)),
            instants: Rc::new(instants),
        }
    }

    /// Number of `now_ms` calls consumed so far.
    pub fn calls(&self) -> usize {
        self.next_idx.get()
    }
}

impl Clock for ScriptedClock {
    fn now_ms(&self) -> u64 {
        let idx = self.next_idx.get();
        let value = self
            .instants
            .get(idx)
            .copied()
            .unwrap_or_else(|| *self.instants.last().expect("script is non-empty"));
        self.next_idx.set(idx + 1);
        value
    }
}
