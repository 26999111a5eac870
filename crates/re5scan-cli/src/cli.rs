//! Command line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "re5scan")]
#[command(version, about = "Live game state reader for Resident Evil 5")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "re5scan.toml", global = true)]
    pub config: PathBuf,

    /// Executable name to attach to
    #[arg(long, env = "RE5SCAN_PROCESS", global = true)]
    pub process_name: Option<String>,

    /// Poll cadence in milliseconds
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Minimum time between pointer re-resolutions in milliseconds
    #[arg(long, global = true)]
    pub resolve_interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            process_name: self.process_name.clone(),
            poll_interval_ms: self.poll_interval_ms,
            resolve_interval_ms: self.resolve_interval_ms,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Poll the game and print one JSON snapshot per line (default)
    Watch,

    /// Print the SHA-256 digest and build of an executable image
    Identify {
        /// Image to hash; defaults to the running game's executable
        path: Option<PathBuf>,
    },

    /// Attach once and print the resolved field addresses
    Status,
}
