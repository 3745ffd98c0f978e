//! Manager configuration
//!
//! Defines the configurable parameters of the task subsystem: backend
//! connection, polling cadence, and the location of the persisted state.

use std::path::PathBuf;
use std::time::Duration;

/// Task manager configuration
///
/// The poll interval is the only tunable the subsystem itself recognizes;
/// the rest locates its collaborators.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (e.g., "http://localhost:8000")
    pub backend_url: String,

    /// How often to poll the backend for status of non-terminal tasks
    pub poll_interval: Duration,

    /// Where the task table is persisted; `None` keeps it in memory only
    pub state_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(backend_url: String) -> Self {
        Self {
            backend_url,
            poll_interval: Duration::from_millis(3000),
            state_path: default_state_path(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - NOTEFLOW_BACKEND_URL (required)
    /// - NOTEFLOW_POLL_INTERVAL_MS (optional, default: 3000)
    /// - NOTEFLOW_STATE_PATH (optional, default: platform data dir)
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url = std::env::var("NOTEFLOW_BACKEND_URL")
            .map_err(|_| anyhow::anyhow!("NOTEFLOW_BACKEND_URL environment variable not set"))?;

        let poll_interval = std::env::var("NOTEFLOW_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(3000));

        let state_path = std::env::var("NOTEFLOW_STATE_PATH")
            .ok()
            .map(PathBuf::from)
            .or_else(default_state_path);

        Ok(Self {
            backend_url,
            poll_interval,
            state_path,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.is_empty() {
            anyhow::bail!("backend_url cannot be empty");
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000".to_string())
    }
}

/// Default location of the persisted task table
///
/// `None` when the platform offers no data directory; the store then runs
/// in memory only.
pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("noteflow").join("tasks.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_millis(3000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid URL should fail
        config.backend_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.backend_url = "http://localhost:8000".to_string();
        assert!(config.validate().is_ok());

        // Zero interval should fail
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
