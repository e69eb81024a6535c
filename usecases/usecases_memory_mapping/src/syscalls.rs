//! System Call Seam
//!
//! The use cases layer describes what it needs from the OS here; the adapters
//! layer provides the real implementation and tests provide fakes.

use entities_memory_mapping::SyncMode;

/// A failed system call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    /// The call failed with this errno
    Failed(i32),
    /// The platform does not implement the call (ENOSYS)
    NotImplemented(i32),
}

impl SyscallError {
    /// The raw errno
    pub fn code(&self) -> i32 {
        match self {
            SyscallError::Failed(code) | SyscallError::NotImplemented(code) => *code,
        }
    }
}

/// What a protection value permits for byte access through the handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessRights {
    /// Reads are permitted
    pub read: bool,
    /// Writes are permitted
    pub write: bool,
}

/// Memory-management system calls
///
/// Addresses are plain `usize` values at this seam. Implementations pass
/// protection, flag and advice integers to the OS verbatim.
///
/// # Safety
///
/// The `unsafe` methods act on arbitrary address ranges. Callers must only
/// pass ranges inside a live mapping previously returned by [`mmap`] on the
/// same backend.
///
/// [`mmap`]: MmanSyscalls::mmap
#[cfg_attr(test, mockall::automock)]
pub trait MmanSyscalls: Send + Sync {
    /// Platform page size in bytes
    fn page_size(&self) -> usize;

    /// Translate a protection value into byte-access rights
    fn access_rights(&self, protection: i32) -> AccessRights;

    /// Establish a mapping, returning its base address
    fn mmap(
        &self,
        len: usize,
        protection: i32,
        flags: i32,
        fd: i32,
        offset: i64,
    ) -> Result<usize, SyscallError>;

    /// Size in bytes of the file behind a mapping created with `flags` and
    /// `fd`, or `None` when the mapping is not limited by a file (anonymous
    /// memory, devices)
    fn backing_len(&self, flags: i32, fd: i32) -> Option<u64>;

    /// Release a mapping
    unsafe fn munmap(&self, addr: usize, len: usize) -> Result<(), SyscallError>;

    /// Apply an access-pattern hint
    unsafe fn madvise(&self, addr: usize, len: usize, advice: i32) -> Result<(), SyscallError>;

    /// Fill `status` with one residency byte per page of `[addr, addr + len)`
    unsafe fn mincore(&self, addr: usize, len: usize, status: &mut [u8]) -> Result<(), SyscallError>;

    /// Flush dirty pages of `[addr, addr + len)`
    unsafe fn msync(&self, addr: usize, len: usize, mode: SyncMode) -> Result<(), SyscallError>;
}
