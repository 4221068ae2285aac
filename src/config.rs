//! Configuration for the dashboard session

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::state::WINDOW_CHOICES;

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the monitoring backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds between refresh ticks
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    /// Initial display window in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_seconds: default_poll_interval_seconds(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl Config {
    /// Reject values a default-constructed session could never have
    pub fn validate(&self) -> crate::Result<()> {
        if self.base_url.is_empty() {
            return Err(crate::OpsdeckError::Config(
                "base_url must not be empty".to_string(),
            ));
        }
        if self.poll_interval_seconds == 0 {
            return Err(crate::OpsdeckError::Config(
                "poll_interval_seconds must be at least 1".to_string(),
            ));
        }
        if !WINDOW_CHOICES.contains(&self.window_seconds) {
            return Err(crate::OpsdeckError::Config(format!(
                "window_seconds must be one of {:?}, got {}",
                WINDOW_CHOICES, self.window_seconds
            )));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_poll_interval_seconds() -> u64 {
    5
}

fn default_window_seconds() -> i64 {
    300
}

/// Load and validate configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::OpsdeckError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
