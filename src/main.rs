// src/main.rs

use anyhow::Result;
use autolock_detection::trace_player::TracePlayer;
use autolock_detection::types::Config;
use autolock_detection::{LOCK_DURATION_MS, SPEED_THRESHOLD_KMH};
use tracing::{error, info};

fn main() -> Result<()> {
    let config = Config::load_or_default("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.clone())
        .init();

    info!("🚗 Auto-Lock Detection Starting");
    info!("✓ Configuration loaded");
    info!(
        "Lock thresholds: speed > {:.1} km/h sustained > {}ms",
        SPEED_THRESHOLD_KMH, LOCK_DURATION_MS
    );

    let player = TracePlayer::new(config.clone());
    let trace_files = player.find_trace_files()?;

    if trace_files.is_empty() {
        error!("No trace files found in {}", config.replay.input_dir);
        return Ok(());
    }

    for (idx, trace_path) in trace_files.iter().enumerate() {
        info!("========================================");
        info!(
            "Replaying trace {}/{}: {}",
            idx + 1,
            trace_files.len(),
            trace_path.display()
        );

        match player.replay(trace_path) {
            Ok(result) => {
                info!("✓ Trace replayed");
                info!("  Samples: {}", result.stats.total_samples);
                info!("  Lock ticks: {}", result.stats.lock_ticks);
                info!("  Timer resets: {}", result.stats.timer_resets);
                match result.stats.first_lock_at_ms {
                    Some(t) => info!("  First lock at t={}ms", t),
                    None => info!("  No lock condition reached"),
                }
                for event in &result.lock_events {
                    info!(
                        "  Lock event: t={}ms after speeding since t={}ms",
                        event.t_ms, event.started_at_ms
                    );
                }
            }
            Err(e) => {
                error!("Failed to replay trace: {}", e);
            }
        }
    }

    Ok(())
}
