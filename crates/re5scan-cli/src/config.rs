//! Loading `MonitorConfig` from TOML with command line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use re5scan_core::MonitorConfig;
use tracing::{info, warn};

/// Values given on the command line; these win over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub process_name: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub resolve_interval_ms: Option<u64>,
}

impl Overrides {
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(name) = &self.process_name {
            config.process_name = name.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(ms) = self.resolve_interval_ms {
            config.resolve_interval_ms = ms;
        }
    }
}

fn read_file(path: &Path) -> Result<MonitorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the config file, falling back to defaults when it is missing or
/// invalid, then apply overrides.
pub fn load(path: &Path, overrides: &Overrides) -> MonitorConfig {
    let mut config = match read_file(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{:#}, using defaults", e);
            MonitorConfig::default()
        }
    };
    overrides.apply(&mut config);
    config
}
