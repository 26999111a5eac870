//! In-memory process doubles for tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{Error, ReadErrorKind, Result};
use crate::memory::ReadMemory;
use crate::process::{GameProcess, ProcessLocator};

#[derive(Debug, Default)]
struct MockState {
    bytes: BTreeMap<u64, u8>,
    running: bool,
    forced_error: Option<ReadErrorKind>,
    reads: usize,
}

/// A fake process whose memory is a sparse byte map.
///
/// Clones share the same memory, so a test can keep one clone to mutate
/// memory or kill the process while the scanner owns the other.
#[derive(Debug, Clone)]
pub struct MockProcess {
    pid: u32,
    base_address: u64,
    image_path: PathBuf,
    state: Rc<RefCell<MockState>>,
}

impl MockProcess {
    pub fn write_bytes(&self, address: u64, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (i, byte) in data.iter().enumerate() {
            state.bytes.insert(address + i as u64, *byte);
        }
    }

    pub fn write_u32(&self, address: u64, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_i32(&self, address: u64, value: i32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_i16(&self, address: u64, value: i16) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Mark the process as exited; further reads fail with a partial copy
    pub fn kill(&self) {
        self.state.borrow_mut().running = false;
    }

    /// Make every read fail with `kind` until cleared with `None`
    pub fn fail_reads(&self, kind: Option<ReadErrorKind>) {
        self.state.borrow_mut().forced_error = kind;
    }

    /// Number of `read_bytes` calls so far
    pub fn read_count(&self) -> usize {
        self.state.borrow().reads
    }
}

impl ReadMemory for MockProcess {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;

        if let Some(kind) = state.forced_error {
            return Err(Error::read_failed(address, kind));
        }
        if !state.running {
            return Err(Error::read_failed(address, ReadErrorKind::PartialCopy));
        }

        (0..size as u64)
            .map(|i| {
                state
                    .bytes
                    .get(&address.wrapping_add(i))
                    .copied()
                    .ok_or_else(|| Error::read_failed(address, ReadErrorKind::PartialCopy))
            })
            .collect()
    }
}

impl GameProcess for MockProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn image_path(&self) -> &Path {
        &self.image_path
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }
}

/// Builder for `MockProcess`
#[derive(Debug)]
pub struct MockMemoryBuilder {
    pid: u32,
    base_address: u64,
    image_path: PathBuf,
    bytes: BTreeMap<u64, u8>,
}

impl Default for MockMemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self {
            pid: 1000,
            base_address: 0x0040_0000,
            image_path: PathBuf::from("re5dx9.exe"),
            bytes: BTreeMap::new(),
        }
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn base_address(mut self, base: u64) -> Self {
        self.base_address = base;
        self
    }

    pub fn with_bytes(mut self, address: u64, data: &[u8]) -> Self {
        for (i, byte) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, *byte);
        }
        self
    }

    pub fn with_u32(self, address: u64, value: u32) -> Self {
        self.with_bytes(address, &value.to_le_bytes())
    }

    pub fn with_i32(self, address: u64, value: i32) -> Self {
        self.with_bytes(address, &value.to_le_bytes())
    }

    pub fn with_i16(self, address: u64, value: i16) -> Self {
        self.with_bytes(address, &value.to_le_bytes())
    }

    pub fn build(self) -> MockProcess {
        MockProcess {
            pid: self.pid,
            base_address: self.base_address,
            image_path: self.image_path,
            state: Rc::new(RefCell::new(MockState {
                bytes: self.bytes,
                running: true,
                forced_error: None,
                reads: 0,
            })),
        }
    }
}

#[derive(Debug, Default)]
struct LocatorState {
    processes: Vec<(String, MockProcess)>,
    lookups: usize,
}

/// Locator over a swappable list of fake processes. Clones share the list.
#[derive(Debug, Clone, Default)]
pub struct MockLocator {
    state: Rc<RefCell<LocatorState>>,
}

impl MockLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, process: MockProcess) {
        self.state
            .borrow_mut()
            .processes
            .push((name.to_string(), process));
    }

    pub fn lookups(&self) -> usize {
        self.state.borrow().lookups
    }
}

impl ProcessLocator for MockLocator {
    type Process = MockProcess;

    fn find_process(&self, name: &str) -> Result<Option<MockProcess>> {
        let mut state = self.state.borrow_mut();
        state.lookups += 1;
        Ok(state
            .processes
            .iter()
            .find(|(n, p)| n == name && p.is_running())
            .map(|(_, p)| p.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reads_written_bytes() {
        let process = MockMemoryBuilder::new().with_u32(0x1000, 0xDEAD_BEEF).build();
        assert_eq!(process.read_u32(0x1000).unwrap(), 0xDEAD_BEEF);
        assert_eq!(process.read_count(), 1);
    }

    #[test]
    fn test_mock_unmapped_read_is_partial_copy() {
        let process = MockMemoryBuilder::new().with_bytes(0x1000, &[1, 2]).build();
        let err = process.read_u32(0x1000).unwrap_err();
        assert!(err.is_partial_copy());
    }

    #[test]
    fn test_mock_clones_share_memory() {
        let process = MockMemoryBuilder::new().build();
        let handle = process.clone();
        handle.write_i32(0x2000, -7);
        assert_eq!(process.read_i32(0x2000).unwrap(), -7);

        handle.kill();
        assert!(!process.is_running());
        assert!(process.read_i32(0x2000).unwrap_err().is_partial_copy());
    }

    #[test]
    fn test_mock_locator_skips_dead_processes() {
        let locator = MockLocator::new();
        let dead = MockMemoryBuilder::new().pid(1).build();
        dead.kill();
        locator.add("re5dx9.exe", dead);
        locator.add("re5dx9.exe", MockMemoryBuilder::new().pid(2).build());

        let found = locator.find_process("re5dx9.exe").unwrap().unwrap();
        assert_eq!(found.pid(), 2);
        assert!(locator.find_process("RE5DX9.EXE").unwrap().is_none());
        assert_eq!(locator.lookups(), 2);
    }
}
