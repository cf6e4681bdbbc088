// src/lib.rs

pub mod clock;
pub mod config;
pub mod lock_gate;
pub mod trace_player;
pub mod types;

pub use clock::{Clock, ManualClock, ScriptedClock, SystemClock};
pub use lock_gate::{AutoLockGate, LOCK_DURATION_MS, SPEED_THRESHOLD_KMH};
pub use types::{Config, LockEvent, ReplayStats, SpeedSample};
