use serde::{Deserialize, Serialize};

use crate::error::{Error, ReadErrorKind, Result};

/// Size of a pointer in the target process.
///
/// The shipped builds are 32-bit executables, so their pointer chains walk
/// 4-byte values even when the scanner itself runs as a 64-bit process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerWidth {
    U32,
    U64,
}

impl PointerWidth {
    pub fn size(self) -> usize {
        match self {
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

/// Reads raw bytes out of a foreign address space.
///
/// Implementors only provide `read_bytes`; typed reads are little-endian
/// decodes on top of it.
pub trait ReadMemory {
    /// Read `size` bytes starting at `address`.
    ///
    /// A buffer shorter than `size` is treated by every typed read as a
    /// partial copy, never trusted or indexed past its end.
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    fn read_i16(&self, address: u64) -> Result<i16> {
        read_array(self, address).map(i16::from_le_bytes)
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        read_array(self, address).map(i32::from_le_bytes)
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        read_array(self, address).map(u32::from_le_bytes)
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        read_array(self, address).map(u64::from_le_bytes)
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        read_array(self, address).map(f32::from_le_bytes)
    }

    /// Read a pointer-sized value, zero-extended to u64
    fn read_pointer(&self, address: u64, width: PointerWidth) -> Result<u64> {
        match width {
            PointerWidth::U32 => self.read_u32(address).map(u64::from),
            PointerWidth::U64 => self.read_u64(address),
        }
    }
}

/// Read exactly `N` bytes; a short buffer is a partial copy
fn read_array<const N: usize, R>(reader: &R, address: u64) -> Result<[u8; N]>
where
    R: ReadMemory + ?Sized,
{
    let bytes = reader.read_bytes(address, N)?;
    bytes
        .get(..N)
        .and_then(|head| <[u8; N]>::try_from(head).ok())
        .ok_or_else(|| Error::read_failed(address, ReadErrorKind::PartialCopy))
}

/// Decode a block of consecutive pointers (e.g. an array of object slots).
///
/// Trailing bytes that do not fill a whole pointer are ignored.
pub fn decode_pointers(bytes: &[u8], width: PointerWidth) -> Vec<u64> {
    match width {
        PointerWidth::U32 => bytes
            .chunks_exact(4)
            .filter_map(|chunk| <[u8; 4]>::try_from(chunk).ok())
            .map(|raw| u64::from(u32::from_le_bytes(raw)))
            .collect(),
        PointerWidth::U64 => bytes
            .chunks_exact(8)
            .filter_map(|chunk| <[u8; 8]>::try_from(chunk).ok())
            .map(u64::from_le_bytes)
            .collect(),
    }
}
