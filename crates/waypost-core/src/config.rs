//! Navigator configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Name of the thread engines execute on
    pub context_thread_name: String,
    /// Window for suppressing repeated pushes of one destination
    pub debounce_window_ms: u64,
    /// Log a screen view for every navigation that carries screen info
    pub log_screen_views: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            log_filter: "info".to_string(),
            context_thread_name: "waypost-main".to_string(),
            debounce_window_ms: 500,
            log_screen_views: true,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.context_thread_name.trim().is_empty() {
            return Err(CoreError::Config(
                "context_thread_name cannot be empty".to_string(),
            ));
        }
        if tracing_subscriber::EnvFilter::try_new(&self.log_filter).is_err() {
            return Err(CoreError::Config(format!(
                "invalid log_filter: {}",
                self.log_filter
            )));
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
