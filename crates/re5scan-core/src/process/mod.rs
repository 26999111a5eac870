//! Locating and holding the target process.

mod handle;

pub use handle::{ProcessHandle, SystemLocator};

use std::path::Path;

use crate::error::Result;
use crate::memory::ReadMemory;

/// A live process the scanner can read from.
///
/// Owning a value of this type owns the OS handle; dropping it releases
/// the handle.
pub trait GameProcess: ReadMemory {
    fn pid(&self) -> u32;

    /// Load address of the main executable module
    fn base_address(&self) -> u64;

    /// Full path of the main executable image
    fn image_path(&self) -> &Path;

    /// Queries the OS; false once the process has exited
    fn is_running(&self) -> bool;
}

/// Finds processes by executable name.
pub trait ProcessLocator {
    type Process: GameProcess;

    /// First process whose executable name matches `name` exactly.
    ///
    /// `Ok(None)` is the normal answer when the game is not running. When
    /// several processes match, which one is returned is unspecified.
    fn find_process(&self, name: &str) -> Result<Option<Self::Process>>;
}
