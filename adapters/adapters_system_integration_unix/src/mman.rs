//! Memory Management Module (Unix-specific)
//!
//! Implements the mapping system calls on top of `libc`: mmap, munmap,
//! madvise, mincore and msync. Protection, flag and advice values are passed
//! to the kernel verbatim; only msync flags are composed here, from the
//! blocking/invalidate mode.

use std::ffi::c_void;
use std::ptr;
use std::sync::Arc;

use entities_memory_mapping::{page_count, MmapResult, SyncMode};
use nix::errno::Errno;
use nix::sys::mman::MsFlags;
use nix::sys::stat::fstat;
use usecases_memory_mapping::{
    AccessRights, MapOutcome, MapRequest, Mapping, MmanSyscalls, SyscallError,
};

use crate::constants::PAGE_SIZE;

/// Read errno after a failed call
///
/// ENOSYS is kept apart so callers can tell "not implemented here" from a
/// real failure.
fn last_error() -> SyscallError {
    match Errno::last() {
        Errno::ENOSYS => SyscallError::NotImplemented(Errno::ENOSYS as i32),
        errno => SyscallError::Failed(errno as i32),
    }
}

fn check(ret: libc::c_int) -> Result<(), SyscallError> {
    if ret == 0 {
        Ok(())
    } else {
        Err(last_error())
    }
}

/// msync flags for a sync mode
///
/// Exactly one of `MS_SYNC` / `MS_ASYNC` is set, plus `MS_INVALIDATE` when
/// requested.
pub fn msync_flags(mode: SyncMode) -> MsFlags {
    let mut flags = if mode.blocking {
        MsFlags::MS_SYNC
    } else {
        MsFlags::MS_ASYNC
    };
    if mode.invalidate {
        flags |= MsFlags::MS_INVALIDATE;
    }
    flags
}

/// `libc`-backed memory-management system calls
#[derive(Debug, Clone, Copy, Default)]
pub struct LibcMman;

impl MmanSyscalls for LibcMman {
    fn page_size(&self) -> usize {
        *PAGE_SIZE
    }

    fn access_rights(&self, protection: i32) -> AccessRights {
        AccessRights {
            read: protection & libc::PROT_READ != 0,
            write: protection & libc::PROT_WRITE != 0,
        }
    }

    fn mmap(
        &self,
        len: usize,
        protection: i32,
        flags: i32,
        fd: i32,
        offset: i64,
    ) -> Result<usize, SyscallError> {
        let offset = libc::off_t::try_from(offset)
            .map_err(|_| SyscallError::Failed(libc::EOVERFLOW))?;
        // Always a null hint: the kernel picks the address.
        let addr = unsafe { libc::mmap(ptr::null_mut(), len, protection, flags, fd, offset) };
        if addr == libc::MAP_FAILED {
            Err(last_error())
        } else {
            Ok(addr as usize)
        }
    }

    fn backing_len(&self, flags: i32, fd: i32) -> Option<u64> {
        if flags & libc::MAP_ANON != 0 {
            return None;
        }
        match fstat(fd) {
            Ok(stat) if stat.st_mode & libc::S_IFMT == libc::S_IFREG => {
                Some(u64::try_from(stat.st_size).unwrap_or(0))
            }
            Ok(_) => None,
            Err(errno) => {
                // Nothing is known to be backed; refuse byte access.
                log::warn!("fstat({}) after mmap failed, {}", fd, errno);
                Some(0)
            }
        }
    }

    unsafe fn munmap(&self, addr: usize, len: usize) -> Result<(), SyscallError> {
        check(libc::munmap(addr as *mut c_void, len))
    }

    unsafe fn madvise(&self, addr: usize, len: usize, advice: i32) -> Result<(), SyscallError> {
        check(libc::madvise(addr as *mut c_void, len, advice))
    }

    unsafe fn mincore(&self, addr: usize, len: usize, status: &mut [u8]) -> Result<(), SyscallError> {
        if status.len() < page_count(len, *PAGE_SIZE) {
            return Err(SyscallError::Failed(libc::EINVAL));
        }
        check(libc::mincore(addr as *mut c_void, len, status.as_mut_ptr().cast()))
    }

    unsafe fn msync(&self, addr: usize, len: usize, mode: SyncMode) -> Result<(), SyscallError> {
        check(libc::msync(addr as *mut c_void, len, msync_flags(mode).bits()))
    }
}

lazy_static::lazy_static! {
    static ref BACKEND: Arc<LibcMman> = Arc::new(LibcMman);
}

/// Shared `libc` backend
pub fn backend() -> Arc<dyn MmanSyscalls> {
    BACKEND.clone()
}

/// Establish a mapping with the `libc` backend
///
/// Equivalent to `Mapping::map(backend(), request)`.
///
/// # Safety
///
/// Same contract as [`Mapping::map`]: a backing file must not be truncated
/// below the mapped range while the handle is alive.
pub unsafe fn map(request: &MapRequest) -> MmapResult<MapOutcome> {
    Mapping::map(backend(), request)
}
