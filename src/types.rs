// src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub input_dir: String,
    /// Stop replaying a trace after the first lock tick instead of
    /// running it to the end.
    pub stop_on_first_lock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// One recorded speed reading, timestamped in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedSample {
    pub t_ms: u64,
    pub speed_kmh: f32,
}

/// Emitted when the gate starts returning `true` after a stretch of
/// `false` results. Repeated lock ticks within the same continuous
/// speeding stretch collapse into one event.
#[derive(Debug, Clone, Serialize)]
pub struct LockEvent {
    /// Timestamp of the sample that fired the lock.
    pub t_ms: u64,
    /// Timestamp at which the continuous-speeding timer started.
    pub started_at_ms: u64,
    pub speed_kmh: f32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayStats {
    pub total_samples: u64,
    /// Number of samples for which the gate returned `true`.
    pub lock_ticks: u64,
    /// Timestamp of the first lock tick, if any.
    pub first_lock_at_ms: Option<u64>,
    /// Number of times a running timer was cleared by a slowdown.
    pub timer_resets: u64,
}
