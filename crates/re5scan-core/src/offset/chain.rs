use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::memory::{PointerWidth, ReadMemory};

/// Path from the module base to a field through zero or more pointers.
///
/// Resolution reads a pointer at `base + base_offset`, then for every
/// offset but the last adds it to the previous pointer and reads again.
/// The last offset is added without a read, so `offsets.len()` pointers are
/// dereferenced in total and an empty list means a static address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerChain {
    pub base_offset: u64,
    pub offsets: Vec<u64>,
}

impl PointerChain {
    pub fn new(base_offset: u64, offsets: &[u64]) -> Self {
        Self {
            base_offset,
            offsets: offsets.to_vec(),
        }
    }

    /// Chain with no indirection (a field inside the module image)
    pub fn fixed(base_offset: u64) -> Self {
        Self::new(base_offset, &[])
    }

    /// Number of pointer reads a resolution performs
    pub fn depth(&self) -> usize {
        self.offsets.len()
    }

    /// Walk the chain to an absolute address.
    ///
    /// Fails on the first unreadable or null intermediate pointer; no
    /// partially walked address is ever returned.
    pub fn resolve<R: ReadMemory + ?Sized>(
        &self,
        reader: &R,
        module_base: u64,
        width: PointerWidth,
    ) -> Result<u64> {
        let mut address = module_base.wrapping_add(self.base_offset);

        for (level, offset) in self.offsets.iter().enumerate() {
            let pointer = reader.read_pointer(address, width)?;
            if pointer == 0 {
                return Err(Error::NullPointer { address, level });
            }
            address = pointer.wrapping_add(*offset);
        }

        Ok(address)
    }
}

impl fmt::Display for PointerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[base+{:#X}]", self.base_offset)?;
        for offset in &self.offsets {
            write!(f, " -> +{:#X}", offset)?;
        }
        Ok(())
    }
}
