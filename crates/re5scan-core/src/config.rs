//! Monitor configuration and timing constants.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing constants for polling and pointer resolution
pub mod timing {
    /// Minimum time between pointer chain re-resolutions (ms)
    pub const RESOLVE_INTERVAL_MS: u64 = 2000;

    /// Default host poll cadence used by the CLI (ms)
    pub const POLL_INTERVAL_MS: u64 = 500;
}

/// Executable name of the game process
pub const PROCESS_NAME: &str = "re5dx9.exe";

/// Configuration for the `Monitor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Exact executable name to look for
    pub process_name: String,
    /// Pointer re-resolution interval
    pub resolve_interval_ms: u64,
    /// Poll cadence for hosts that let us drive the loop
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            process_name: PROCESS_NAME.to_string(),
            resolve_interval_ms: timing::RESOLVE_INTERVAL_MS,
            poll_interval_ms: timing::POLL_INTERVAL_MS,
        }
    }
}

impl MonitorConfig {
    /// Create a new configuration builder
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    pub fn resolve_interval(&self) -> Duration {
        Duration::from_millis(self.resolve_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Builder for MonitorConfig
#[derive(Debug, Clone, Default)]
pub struct MonitorConfigBuilder {
    process_name: Option<String>,
    resolve_interval_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
}

impl MonitorConfigBuilder {
    /// Set the executable name to attach to
    pub fn process_name<S: Into<String>>(mut self, name: S) -> Self {
        self.process_name = Some(name.into());
        self
    }

    /// Set the pointer re-resolution interval
    pub fn resolve_interval(mut self, interval: Duration) -> Self {
        self.resolve_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Set the host poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Build the configuration
    pub fn build(self) -> MonitorConfig {
        let default = MonitorConfig::default();
        MonitorConfig {
            process_name: self.process_name.unwrap_or(default.process_name),
            resolve_interval_ms: self
                .resolve_interval_ms
                .unwrap_or(default.resolve_interval_ms),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(default.poll_interval_ms),
        }
    }
}
