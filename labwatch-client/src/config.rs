//! Client settings - refresh intervals, the stream endpoint, and the
//! watched services.
//!
//! Settings come from an optional TOML file layered under `LABWATCH_*`
//! environment variables; anything not given falls back to the defaults
//! below. The service list itself normally arrives from the external
//! config store at runtime, but can be seeded from the settings file for
//! standalone use.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use labwatch_types::DashboardConfig;

/// Seconds between stats polls (container counts, entity counts).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
/// Seconds between reachability checks.
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 5;
/// Seconds between metric samples.
pub const DEFAULT_METRICS_INTERVAL_SECS: u64 = 5;
/// Where the live-log stream lives by default.
pub const DEFAULT_STREAM_URL: &str = "ws://localhost:3001/ws";

/// Runtime settings for the data-refresh client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between stats polls.
    pub poll_interval_secs: u64,
    /// Seconds between reachability checks.
    pub status_interval_secs: u64,
    /// Seconds between metric samples.
    pub metrics_interval_secs: u64,
    /// WebSocket endpoint of the live-log stream.
    pub stream_url: String,
    /// Seed service list, replaced by the config store once reachable.
    pub dashboard: DashboardConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            status_interval_secs: DEFAULT_STATUS_INTERVAL_SECS,
            metrics_interval_secs: DEFAULT_METRICS_INTERVAL_SECS,
            stream_url: DEFAULT_STREAM_URL.to_string(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if it exists) with `LABWATCH_*`
    /// environment variables layered on top.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("LABWATCH"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_secs)
    }
}
