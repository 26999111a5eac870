use std::fmt;

use thiserror::Error;

use crate::version::GameVersion;

/// Classification of a failed foreign-process read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadErrorKind {
    /// Only part of the range could be copied (`ERROR_PARTIAL_COPY`).
    /// Expected while the game exits or while pointers are being swapped.
    PartialCopy,
    AccessDenied,
    InvalidHandle,
    /// Any other OS error code.
    Os(i32),
}

impl fmt::Display for ReadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartialCopy => write!(f, "partial copy"),
            Self::AccessDenied => write!(f, "access denied"),
            Self::InvalidHandle => write!(f, "invalid handle"),
            Self::Os(code) => write!(f, "os error {}", code),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {kind}")]
    MemoryReadFailed { address: u64, kind: ReadErrorKind },

    #[error("Null pointer read at address {address:#x} (level {level})")]
    NullPointer { address: u64, level: usize },

    #[error("Unsupported game version: {0}")]
    UnsupportedVersion(GameVersion),

    #[error("Game version mismatch: attached {attached}, requested {requested}")]
    VersionMismatch {
        attached: GameVersion,
        requested: GameVersion,
    },

    #[error("Scanner is not attached to a process")]
    NotAttached,

    #[error("Pointers have not been resolved")]
    PointersNotResolved,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn read_failed(address: u64, kind: ReadErrorKind) -> Self {
        Error::MemoryReadFailed { address, kind }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Check if this is a partial/interrupted copy from the target process
    pub fn is_partial_copy(&self) -> bool {
        matches!(
            self,
            Error::MemoryReadFailed {
                kind: ReadErrorKind::PartialCopy,
                ..
            }
        )
    }

    /// Errors that recur naturally while the game loads, switches areas or
    /// exits. These are never reported to the host.
    pub fn is_transient(&self) -> bool {
        self.is_partial_copy() || matches!(self, Error::NullPointer { .. })
    }
}
