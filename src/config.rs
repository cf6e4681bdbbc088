// src/config.rs

use crate::types::{Config, LoggingConfig, ReplayConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            replay: ReplayConfig {
                input_dir: "traces".to_string(),
                stop_on_first_lock: false,
            },
            logging: LoggingConfig {
                level: "autolock_detection=info".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    /// Callers that care can check existence themselves; this stays quiet
    /// because it runs before logging is initialized.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
