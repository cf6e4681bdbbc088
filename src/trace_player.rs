// src/trace_player.rs
//
// Replays recorded speed traces through an AutoLockGate. A trace is a
// YAML list of timestamped speed samples; the player drives a
// ManualClock from the sample timestamps so replay is deterministic and
// does not depend on wall-clock time.

use crate::clock::ManualClock;
use crate::lock_gate::AutoLockGate;
use crate::types::{Config, LockEvent, ReplayStats, SpeedSample};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct TracePlayer {
    config: Config,
}

pub struct ReplayResult {
    pub stats: ReplayStats,
    pub lock_events: Vec<LockEvent>,
}

impl TracePlayer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn find_trace_files(&self) -> Result<Vec<PathBuf>> {
        let mut traces = Vec::new();

        let trace_extensions = ["yaml", "yml"];

        for entry in WalkDir::new(&self.config.replay.input_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if let Some(ext) = path.extension() {
                if trace_extensions.contains(&ext.to_str().unwrap_or("")) {
                    traces.push(path.to_path_buf());
                }
            }
        }

        traces.sort();
        info!("Found {} trace file(s)", traces.len());
        Ok(traces)
    }

    pub fn load_trace(&self, path: &Path) -> Result<Vec<SpeedSample>> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace file: {}", path.display()))?;
        let samples: Vec<SpeedSample> = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse trace file: {}", path.display()))?;
        Ok(samples)
    }

    /// Replay one trace through a fresh gate and collect statistics.
    ///
    /// Consecutive lock ticks within one speeding stretch collapse into a
    /// single `LockEvent`; the per-tick results are still counted in the
    /// stats.
    pub fn replay(&self, path: &Path) -> Result<ReplayResult> {
        let samples = self.load_trace(path)?;
        info!(
            "Replaying {} ({} samples)",
            path.display(),
            samples.len()
        );

        let clock = ManualClock::new();
        let mut gate = AutoLockGate::new(clock.clone());

        let mut stats = ReplayStats::default();
        let mut lock_events = Vec::new();
        let mut locked_in_stretch = false;

        for sample in &samples {
            clock.set(sample.t_ms);

            let was_timing = gate.is_timing();
            let started_at = gate.started_at_ms();
            let lock = gate.update(sample.speed_kmh);

            stats.total_samples += 1;

            if was_timing && !gate.is_timing() {
                stats.timer_resets += 1;
                locked_in_stretch = false;
            }

            if lock {
                stats.lock_ticks += 1;
                if stats.first_lock_at_ms.is_none() {
                    stats.first_lock_at_ms = Some(sample.t_ms);
                }
                if !locked_in_stretch {
                    locked_in_stretch = true;
                    let event = LockEvent {
                        t_ms: sample.t_ms,
                        started_at_ms: started_at.unwrap_or(sample.t_ms),
                        speed_kmh: sample.speed_kmh,
                    };
                    info!(
                        "🔒 Lock at t={}ms ({:.1} km/h, speeding since t={}ms)",
                        event.t_ms, event.speed_kmh, event.started_at_ms
                    );
                    lock_events.push(event);

                    if self.config.replay.stop_on_first_lock {
                        debug!("stop_on_first_lock set, ending replay early");
                        break;
                    }
                }
            }
        }

        Ok(ReplayResult { stats, lock_events })
    }
}
