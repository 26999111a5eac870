//! Prelude module for convenient imports
//!
//! ```ignore
//! use re5scan_core::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Driving: `Monitor`, `MonitorConfig`, `TracingReporter`
//! - Scanning: `MemoryScanner`, `SystemLocator`, `ProcessHandle`
//! - Data: `GameStateSnapshot`, `GameVersion`, `Field`
//! - Error handling: `Error`, `Result`

// Host-facing driver
pub use crate::config::MonitorConfig;
pub use crate::monitor::{ErrorReporter, Monitor, TracingReporter};

// Error handling
pub use crate::error::{Error, Result};

// Lower-level scanning
pub use crate::process::{GameProcess, ProcessHandle, ProcessLocator, SystemLocator};
pub use crate::scanner::MemoryScanner;

// Data
pub use crate::game::{Field, GameStateSnapshot};
pub use crate::version::{GameVersion, identify};
