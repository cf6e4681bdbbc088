// src/lock_gate.rs
//
// Speed-triggered auto-lock gate.
//
// Locks the doors once the vehicle has been continuously above the speed
// threshold for longer than the lock duration. One gate instance tracks
// one vehicle stream; calls must be sequential (no internal
// synchronization).

use crate::clock::Clock;
use tracing::{debug, info};

/// Speed above which the lock timer runs (km/h, strictly greater).
pub const SPEED_THRESHOLD_KMH: f32 = 20.0;

/// Continuous-speeding duration after which the lock fires (ms, strictly
/// greater).
pub const LOCK_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Idle,
    Timing { started_at_ms: u64 },
}

/// Stateful lock decision over a stream of speed samples.
///
/// The clock is injected at construction so callers control where time
/// comes from: `SystemClock` in production, `ScriptedClock`/`ManualClock`
/// in tests and replay.
///
/// Once the lock condition fires, the gate keeps returning `true` on
/// every call until the speed drops back to the threshold; it does not
/// re-arm on fire. Rate-limiting repeated `true` results is the caller's
/// concern.
pub struct AutoLockGate<C: Clock> {
    state: GateState,
    clock: C,
}

impl<C: Clock> AutoLockGate<C> {
    pub fn new(clock: C) -> Self {
        Self {
            state: GateState::Idle,
            clock,
        }
    }

    /// Feed one speed sample; returns `true` when the doors should lock.
    ///
    /// Speeding for the first time starts the timer and returns `false`.
    /// Continued speeding returns `true` once more than `LOCK_DURATION_MS`
    /// has elapsed since the timer started. Any sample at or below
    /// `SPEED_THRESHOLD_KMH` clears the timer.
    pub fn update(&mut self, speed_kmh: f32) -> bool {
        if speed_kmh > SPEED_THRESHOLD_KMH {
            match self.state {
                GateState::Idle => {
                    let now = self.clock.now_ms();
                    debug!("Speeding started at t={}ms ({:.1} km/h)", now, speed_kmh);
                    self.state = GateState::Timing { started_at_ms: now };
                    false
                }
                GateState::Timing { started_at_ms } => {
                    // Saturating: a backwards clock reads as zero elapsed
                    // rather than underflowing into a giant value.
                    let elapsed = self.clock.now_ms().saturating_sub(started_at_ms);
                    if elapsed > LOCK_DURATION_MS {
                        debug!(
                            "Lock condition met: {}ms continuous speeding (started t={}ms)",
                            elapsed, started_at_ms
                        );
                        true
                    } else {
                        false
                    }
                }
            }
        } else {
            if let GateState::Timing { started_at_ms } = self.state {
                info!(
                    "Speed dropped to {:.1} km/h, timer started at t={}ms cleared",
                    speed_kmh, started_at_ms
                );
            }
            self.state = GateState::Idle;
            false
        }
    }

    /// Whether the gate is currently timing a speeding stretch.
    pub fn is_timing(&self) -> bool {
        !matches!(self.state, GateState::Idle)
    }

    /// Instant at which the current speeding stretch began, if timing.
    pub fn started_at_ms(&self) -> Option<u64> {
        match self.state {
            GateState::Idle => None,
            GateState::Timing { started_at_ms } => Some(started_at_ms),
        }
    }

    /// Clear the timer (e.g. when switching to a new vehicle stream).
    pub fn reset(&mut self) {
        self.state = GateState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, ScriptedClock};

    #[test]
    fn test_slow_speed_on_fresh_gate_returns_false() {
        let mut gate = AutoLockGate::new(ScriptedClock::new(vec![1000]));

        assert!(!gate.update(15.0));
        assert!(!gate.is_timing());
        assert_eq!(gate.started_at_ms(), None);
    }

    #[test]
    fn test_first_speeding_sample_starts_timer() {
        let mut gate = AutoLockGate::new(ScriptedClock::new(vec![1000]));

        assert!(!gate.update(25.0));
        assert!(gate.is_timing());
        assert_eq!(gate.started_at_ms(), Some(1000));
    }

    #[test]
    fn test_lock_fires_after_duration_exceeded() {
        let mut gate = AutoLockGate::new(ScriptedClock::new(vec![1000, 7000]));

        assert!(!gate.update(30.0)); // timer starts at 1000
        assert!(gate.update(30.0)); // elapsed 6000 > 5000
        assert_eq!(gate.started_at_ms(), Some(1000));
    }

    #[test]
    fn test_no_lock_within_duration() {
        let mut gate = AutoLockGate::new(ScriptedClock::new(vec![1000, 4000]));

        assert!(!gate.update(30.0));
        assert!(!gate.update(30.0)); // elapsed 3000 <= 5000
    }

    #[test]
    fn test_elapsed_exactly_at_duration_does_not_lock() {
        // Strictly-greater comparison: 5000ms elapsed is not enough.
        let mut gate = AutoLockGate::new(ScriptedClock::new(vec![1000, 6000, 6001]));

        assert!(!gate.update(25.0));
        assert!(!gate.update(25.0)); // elapsed 5000
        assert!(gate.update(25.0)); // elapsed 5001
    }

    #[test]
    fn test_slowdown_resets_timer() {
        let clock = ManualClock::with_initial(1000);
        let mut gate = AutoLockGate::new(clock.clone());

        assert!(!gate.update(30.0));
        assert_eq!(gate.started_at_ms(), Some(1000));

        assert!(!gate.update(10.0));
        assert!(!gate.is_timing());

        // Speeding again restarts from the new current time.
        clock.set(2000);
        assert!(!gate.update(30.0));
        assert_eq!(gate.started_at_ms(), Some(2000));
    }

    #[test]
    fn test_lock_keeps_firing_until_speed_drops() {
        let clock = ManualClock::with_initial(1000);
        let mut gate = AutoLockGate::new(clock.clone());

        assert!(!gate.update(30.0));

        clock.set(7000);
        assert!(gate.update(30.0));

        // Start time is not cleared on fire: every later call fires too.
        clock.set(8000);
        assert!(gate.update(30.0));
        clock.set(9000);
        assert!(gate.update(30.0));
        assert_eq!(gate.started_at_ms(), Some(1000));

        // Until the speed drops.
        assert!(!gate.update(5.0));
        assert!(!gate.is_timing());
    }

    #[test]
    fn test_speed_exactly_at_threshold_resets() {
        let clock = ManualClock::with_initial(1000);
        let mut gate = AutoLockGate::new(clock.clone());

        assert!(!gate.update(30.0));
        assert!(gate.is_timing());

        // Strictly-greater comparison: 20.0 km/h is not speeding.
        assert!(!gate.update(20.0));
        assert!(!gate.is_timing());
    }

    #[test]
    fn test_negative_speed_treated_as_slowdown() {
        let clock = ManualClock::with_initial(1000);
        let mut gate = AutoLockGate::new(clock.clone());

        assert!(!gate.update(30.0));
        assert!(!gate.update(-3.0));
        assert!(!gate.is_timing());
    }

    #[test]
    fn test_backwards_clock_reads_as_zero_elapsed() {
        let clock = ManualClock::with_initial(6000);
        let mut gate = AutoLockGate::new(clock.clone());

        assert!(!gate.update(30.0)); // timer starts at 6000

        // Clock jumps backwards; saturating elapsed stays 0, no lock.
        clock.set(500);
        assert!(!gate.update(30.0));
    }

    #[test]
    fn test_reset_clears_timer() {
        let clock = ManualClock::with_initial(1000);
        let mut gate = AutoLockGate::new(clock.clone());

        gate.update(30.0);
        assert!(gate.is_timing());

        gate.reset();
        assert!(!gate.is_timing());
        assert_eq!(gate.started_at_ms(), None);
    }

    #[test]
    fn test_long_stretch_with_interruption() {
        // Speeding 1000..4000, brief drop, speeding again 4500..10000.
        // The drop restarts the window, so the lock fires relative to
        // 4500, not 1000.
        let clock = ManualClock::with_initial(1000);
        let mut gate = AutoLockGate::new(clock.clone());

        assert!(!gate.update(30.0));
        clock.set(4000);
        assert!(!gate.update(30.0));

        clock.set(4200);
        assert!(!gate.update(12.0));

        clock.set(4500);
        assert!(!gate.update(30.0));
        assert_eq!(gate.started_at_ms(), Some(4500));

        clock.set(9000);
        assert!(!gate.update(30.0)); // elapsed 4500 <= 5000

        clock.set(9501);
        assert!(gate.update(30.0)); // elapsed 5001 > 5000
    }
}
