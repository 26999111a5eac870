//! SHA-256 digests of the known game executables.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::GameVersion;
use crate::error::Result;

/// SHA-256 digest of an executable image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDigest(pub [u8; 32]);

impl ImageDigest {
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Steam WW release (re5dx9 2020-09-22)
const STEAM_1_1_0: [u8; 32] = [
    0xF9, 0xD5, 0x04, 0x6D, 0x3C, 0x19, 0xC2, 0xDD, 0xE7, 0xB5, 0xAB, 0xC5, 0x11, 0x4A, 0x04, 0x2D,
    0x6D, 0x36, 0xE7, 0x0E, 0x3F, 0xA2, 0x9D, 0x79, 0xDC, 0x53, 0x36, 0xD6, 0xE0, 0x3A, 0x0C, 0x1F,
];

/// Steam WW release (re5dx9 2023-08-07)
const STEAM_1_2_0: [u8; 32] = [
    0x75, 0x17, 0x26, 0xF0, 0xEC, 0x8B, 0xD0, 0x1C, 0x00, 0xB0, 0x37, 0xAF, 0x8A, 0xE6, 0x4C, 0xDF,
    0x0B, 0xC5, 0xCC, 0x5B, 0x90, 0x25, 0xF3, 0xF4, 0xD7, 0x82, 0xEF, 0x6F, 0x66, 0xE0, 0x4E, 0x26,
];

/// Every known build and its image digest
pub const KNOWN_BUILDS: &[(GameVersion, [u8; 32])] = &[
    (GameVersion::Steam110, STEAM_1_1_0),
    (GameVersion::Steam120, STEAM_1_2_0),
];

/// Map a digest to its build, or `Unknown`
pub fn version_for_digest(digest: &ImageDigest) -> GameVersion {
    KNOWN_BUILDS
        .iter()
        .find(|(_, known)| *known == digest.0)
        .map(|(version, _)| *version)
        .unwrap_or(GameVersion::Unknown)
}

/// Hash the full content of an executable image.
///
/// The file is opened read-only and shared for read, write and delete so
/// the running game (which keeps its image open) is never blocked.
pub fn digest_file<P: AsRef<Path>>(path: P) -> Result<ImageDigest> {
    let mut file = open_shared(path.as_ref())?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(ImageDigest(hasher.finalize().into()))
}

/// Identify the build of the executable at `path`.
///
/// Unrecognized images return `Unknown`; only I/O failures are errors.
pub fn identify<P: AsRef<Path>>(path: P) -> Result<GameVersion> {
    let path = path.as_ref();
    let digest = digest_file(path)?;
    let version = version_for_digest(&digest);
    debug!("Image {} digest {} -> {}", path.display(), digest, version);
    Ok(version)
}

#[cfg(target_os = "windows")]
fn open_shared(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;
    use windows::Win32::Storage::FileSystem::{
        FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE,
    };

    OpenOptions::new()
        .read(true)
        .share_mode((FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE).0)
        .open(path)
}

#[cfg(not(target_os = "windows"))]
fn open_shared(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).open(path)
}
