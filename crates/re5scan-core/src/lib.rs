//! # re5scan-core
//!
//! Core library for reading live game state out of Resident Evil 5
//! (`re5dx9.exe`).
//!
//! This crate provides:
//! - Build identification by SHA-256 of the executable image
//! - Windows process lookup and memory reading
//! - Per-build pointer chain tables and their resolution
//! - A memory scanner with an attach / resolve / refresh lifecycle
//! - A polling monitor that hosts drive on their own timer

pub mod config;
pub mod error;
pub mod game;
pub mod memory;
pub mod monitor;
pub mod offset;
pub mod prelude;
pub mod process;
pub mod scanner;
pub mod version;

pub use config::{MonitorConfig, MonitorConfigBuilder};
pub use error::{Error, ReadErrorKind, Result};
pub use game::{
    DifficultyStatus, EnemyStatus, Field, FieldValue, GameStateSnapshot, PlayerStatus, ValueKind,
};
pub use memory::{PointerWidth, ReadMemory};
pub use monitor::{ErrorReporter, Monitor, TracingReporter};
pub use offset::{
    EnemyTableLayout, FieldLayout, PointerChain, PointerTable, PointerTableSet, ResolvedAddressSet,
};
pub use process::{GameProcess, ProcessHandle, ProcessLocator, SystemLocator};
pub use scanner::{Clock, MemoryScanner, ResolveTimer, ScannerState, SystemClock};
pub use version::{
    GameVersion, ImageDigest, KNOWN_BUILDS, digest_file, identify, version_for_digest,
};
