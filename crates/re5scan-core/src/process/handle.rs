use std::path::{Path, PathBuf};

use super::{GameProcess, ProcessLocator};
use crate::error::Result;
use crate::memory::ReadMemory;

#[cfg(target_os = "windows")]
pub use self::windows_impl::*;

#[cfg(not(target_os = "windows"))]
pub use self::unsupported::*;

/// Locator backed by the OS process list
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocator;

impl ProcessLocator for SystemLocator {
    type Process = ProcessHandle;

    fn find_process(&self, name: &str) -> Result<Option<ProcessHandle>> {
        ProcessHandle::find(name)
    }
}

impl GameProcess for ProcessHandle {
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
        self.query_running()
    }
}

impl ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.read_raw(address, size)
    }
}

#[cfg(target_os = "windows")]
mod windows_impl {
    use std::ffi::c_void;

    use tracing::debug;
    use windows::Win32::Foundation::{
        CloseHandle, ERROR_ACCESS_DENIED, ERROR_INVALID_HANDLE, ERROR_PARTIAL_COPY, HANDLE,
        STILL_ACTIVE,
    };
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, PROCESSENTRY32W,
        Process32FirstW, Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
        TH32CS_SNAPPROCESS,
    };
    use windows::Win32::System::Threading::{
        GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
    };

    use super::*;
    use crate::error::{Error, ReadErrorKind};

    /// Closes a Win32 handle on drop
    struct OwnedHandle(HANDLE);

    impl Drop for OwnedHandle {
        fn drop(&mut self) {
            // SAFETY: the handle was returned by a successful Win32 call and
            // is closed exactly once here.
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }

    /// Open handle to the game process
    pub struct ProcessHandle {
        handle: OwnedHandle,
        pub pid: u32,
        pub base_address: u64,
        pub image_path: PathBuf,
    }

    // SAFETY: process HANDLEs are valid from any thread; the handle is owned
    // exclusively and never shared.
    unsafe impl Send for ProcessHandle {}

    impl ProcessHandle {
        /// Find the first process named `name` and open it
        pub fn find(name: &str) -> Result<Option<Self>> {
            match find_pid(name)? {
                Some(pid) => Self::open(pid).map(Some),
                None => Ok(None),
            }
        }

        /// Open a process by id for reading
        pub fn open(pid: u32) -> Result<Self> {
            // SAFETY: OpenProcess has no memory-safety preconditions.
            let handle = unsafe {
                OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_LIMITED_INFORMATION, false, pid)
            }
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;
            let handle = OwnedHandle(handle);

            let (base_address, image_path) = main_module(pid)?;
            debug!(
                "Opened pid {} (base: {:#x}, image: {})",
                pid,
                base_address,
                image_path.display()
            );

            Ok(Self {
                handle,
                pid,
                base_address,
                image_path,
            })
        }

        pub(super) fn query_running(&self) -> bool {
            let mut exit_code = 0u32;
            // SAFETY: the handle is open with PROCESS_QUERY_LIMITED_INFORMATION
            // and exit_code is a valid out pointer.
            let queried = unsafe { GetExitCodeProcess(self.handle.0, &mut exit_code) };
            queried.is_ok() && exit_code == STILL_ACTIVE.0 as u32
        }

        pub(super) fn read_raw(&self, address: u64, size: usize) -> Result<Vec<u8>> {
            let mut buffer = vec![0u8; size];
            let mut bytes_read = 0usize;

            // SAFETY: buffer is valid for `size` bytes; the OS validates the
            // foreign address range and reports failures as errors.
            let result = unsafe {
                ReadProcessMemory(
                    self.handle.0,
                    address as *const c_void,
                    buffer.as_mut_ptr() as *mut c_void,
                    size,
                    Some(&mut bytes_read),
                )
            };

            match result {
                Ok(()) if bytes_read == size => Ok(buffer),
                Ok(()) => Err(Error::read_failed(address, ReadErrorKind::PartialCopy)),
                Err(e) => Err(Error::read_failed(address, classify(&e))),
            }
        }
    }

    fn classify(error: &windows::core::Error) -> ReadErrorKind {
        let code = error.code();
        if code == ERROR_PARTIAL_COPY.to_hresult() {
            ReadErrorKind::PartialCopy
        } else if code == ERROR_ACCESS_DENIED.to_hresult() {
            ReadErrorKind::AccessDenied
        } else if code == ERROR_INVALID_HANDLE.to_hresult() {
            ReadErrorKind::InvalidHandle
        } else {
            ReadErrorKind::Os(code.0)
        }
    }

    fn wide_to_string(wide: &[u16]) -> String {
        let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
        String::from_utf16_lossy(&wide[..len])
    }

    fn find_pid(name: &str) -> Result<Option<u32>> {
        // SAFETY: CreateToolhelp32Snapshot has no memory-safety preconditions.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| Error::ProcessOpenFailed(format!("process snapshot: {}", e)))?;
        let snapshot = OwnedHandle(snapshot);

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: entry is initialized with its dwSize as the API requires.
        let mut next = unsafe { Process32FirstW(snapshot.0, &mut entry) };
        while next.is_ok() {
            if wide_to_string(&entry.szExeFile) == name {
                return Ok(Some(entry.th32ProcessID));
            }
            // SAFETY: as above.
            next = unsafe { Process32NextW(snapshot.0, &mut entry) };
        }

        Ok(None)
    }

    fn main_module(pid: u32) -> Result<(u64, PathBuf)> {
        // SAFETY: CreateToolhelp32Snapshot has no memory-safety preconditions.
        let snapshot =
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
                .map_err(|e| Error::ProcessOpenFailed(format!("module snapshot: {}", e)))?;
        let snapshot = OwnedHandle(snapshot);

        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: entry is initialized with its dwSize as the API requires.
        unsafe { Module32FirstW(snapshot.0, &mut entry) }
            .map_err(|e| Error::ProcessOpenFailed(format!("main module of pid {}: {}", pid, e)))?;

        Ok((
            entry.modBaseAddr as u64,
            PathBuf::from(wide_to_string(&entry.szExePath)),
        ))
    }
}

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use std::io;

    use super::*;
    use crate::error::Error;

    fn unsupported() -> Error {
        Error::Io(io::Error::new(
            io::ErrorKind::Unsupported,
            "process access is only supported on Windows",
        ))
    }

    /// Open handle to the game process
    pub struct ProcessHandle {
        pub pid: u32,
        pub base_address: u64,
        pub image_path: PathBuf,
    }

    impl ProcessHandle {
        pub fn find(_name: &str) -> Result<Option<Self>> {
            Err(unsupported())
        }

        pub fn open(_pid: u32) -> Result<Self> {
            Err(unsupported())
        }

        pub(super) fn query_running(&self) -> bool {
            false
        }

        pub(super) fn read_raw(&self, _address: u64, _size: usize) -> Result<Vec<u8>> {
            Err(unsupported())
        }
    }
}
