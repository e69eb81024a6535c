//! Mapping Module
//!
//! The owned mapping handle. A [`Mapping`] records the exact `(address,
//! length)` the OS returned and releases it once, when the handle is dropped
//! or explicitly unmapped. Advise, incore and sync borrow the handle and live
//! in their own modules.

use std::fmt;
use std::ptr::{self, NonNull};
use std::sync::Arc;

use entities_memory_mapping::{ErrorCause, MmapError, MmapResult};

use crate::request::MapRequest;
use crate::syscalls::{AccessRights, MmanSyscalls};

/// An established memory mapping
///
/// Reads through [`read_at`](Mapping::read_at) observe whatever the backing
/// file holds at that moment; other processes sharing the file may change it
/// between calls.
///
/// Byte access is limited to the part of the mapping the backing file
/// covered when it was created ([`backed_len`](Mapping::backed_len)). Pages
/// past the end of the file raise SIGBUS when touched.
pub struct Mapping {
    addr: NonNull<u8>,
    len: usize,
    backed_len: usize,
    protection: i32,
    rights: AccessRights,
    released: bool,
    sys: Arc<dyn MmanSyscalls>,
}

// SAFETY: the handle only hands out copies of the mapped bytes or raw
// pointers; mutation through it requires `&mut self`. The region itself is
// plain memory owned by this handle until release.
unsafe impl Send for Mapping {}
unsafe impl Sync for Mapping {}

/// Result of [`Mapping::map`]
///
/// A mapping that was established stays valid even when the advice applied
/// right after it failed; the failure is reported alongside the handle.
#[derive(Debug)]
#[must_use = "a failed advice is reported in `advice`, not in the outer Result"]
pub struct MapOutcome {
    /// The established mapping
    pub mapping: Mapping,
    /// Outcome of the post-mapping advice, `Ok` when none was requested
    pub advice: MmapResult<()>,
}

impl MapOutcome {
    /// Split into the handle and the advice outcome
    pub fn into_parts(self) -> (Mapping, MmapResult<()>) {
        (self.mapping, self.advice)
    }
}

impl Mapping {
    /// Establish a mapping
    ///
    /// # Errors
    ///
    /// Returns `MmapError::Mapping` if the request is malformed (zero size,
    /// size or offset out of range for the platform) or if mmap fails. An
    /// advice failure does not fail the call; see [`MapOutcome`].
    ///
    /// # Safety
    ///
    /// For a file-backed mapping the caller must ensure the file is not
    /// truncated below the mapped range while the handle is alive. Access is
    /// checked against the file size seen here, and touching a page that
    /// has since lost its backing kills the process with SIGBUS. The caller
    /// must also accept that other processes sharing the file can change the
    /// mapped bytes at any time.
    pub unsafe fn map(sys: Arc<dyn MmanSyscalls>, request: &MapRequest) -> MmapResult<MapOutcome> {
        if request.size == 0 {
            return Err(MmapError::Mapping(ErrorCause::argument(
                "size must be greater than zero",
            )));
        }
        let len = usize::try_from(request.size).map_err(|_| {
            MmapError::Mapping(ErrorCause::argument(format!(
                "size {} exceeds the address space",
                request.size
            )))
        })?;
        let offset = i64::try_from(request.offset).map_err(|_| {
            MmapError::Mapping(ErrorCause::argument(format!(
                "offset {} out of range",
                request.offset
            )))
        })?;

        let addr = sys
            .mmap(len, request.protection, request.flags, request.fd, offset)
            .map_err(|e| MmapError::Mapping(ErrorCause::Os(e.code())))?;
        let addr = NonNull::new(addr as *mut u8)
            .ok_or_else(|| MmapError::Mapping(ErrorCause::argument("mmap returned a null address")))?;

        let rights = sys.access_rights(request.protection);
        let backed_len = match sys.backing_len(request.flags, request.fd) {
            Some(file_len) => file_len.saturating_sub(request.offset).min(len as u64) as usize,
            None => len,
        };
        if backed_len < len {
            log::debug!(
                "file behind fd {} covers {} of {} mapped bytes",
                request.fd,
                backed_len,
                len
            );
        }
        let mapping = Mapping {
            addr,
            len,
            backed_len,
            protection: request.protection,
            rights,
            released: false,
            sys,
        };
        log::debug!(
            "mapped {} bytes at {:p} (prot {:#x}, flags {:#x}, fd {}, offset {})",
            len,
            mapping.addr,
            request.protection,
            request.flags,
            request.fd,
            request.offset
        );

        let advice = if request.advise != 0 {
            mapping.advise(None, request.advise)
        } else {
            Ok(())
        };
        if let Err(ref e) = advice {
            log::debug!("advice {} after mapping failed: {}", request.advise, e);
        }

        Ok(MapOutcome { mapping, advice })
    }

    /// Length in bytes, exactly as requested at creation
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; mappings are never empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes from the start of the mapping that the backing file covered at
    /// creation; equal to [`len`](Mapping::len) for anonymous memory
    pub fn backed_len(&self) -> usize {
        self.backed_len
    }

    /// Protection value the mapping was created with
    pub fn protection(&self) -> i32 {
        self.protection
    }

    /// Base address
    pub fn as_ptr(&self) -> *const u8 {
        self.addr.as_ptr()
    }

    /// Base address for writing
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.addr.as_ptr()
    }

    pub(crate) fn base(&self) -> usize {
        self.addr.as_ptr() as usize
    }

    pub(crate) fn sys(&self) -> &dyn MmanSyscalls {
        self.sys.as_ref()
    }

    /// Copy bytes out of the mapping
    ///
    /// # Errors
    ///
    /// Returns `MmapError::Access` if the mapping is not readable or the
    /// range lies outside it or past the end of the backing file.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> MmapResult<()> {
        if !self.rights.read {
            return Err(self.access_error(offset, buf.len(), "mapping is not readable"));
        }
        let start = self.check_bounds(offset, buf.len())?;
        // SAFETY: [start, start + buf.len()) is inside the live mapping,
        // backed and readable; buf is a distinct Rust allocation.
        unsafe {
            ptr::copy_nonoverlapping(self.addr.as_ptr().add(start), buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }

    /// Copy bytes into the mapping
    ///
    /// # Errors
    ///
    /// Returns `MmapError::Access` if the mapping is not writable or the
    /// range lies outside it or past the end of the backing file.
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> MmapResult<()> {
        if !self.rights.write {
            return Err(self.access_error(offset, data.len(), "mapping is not writable"));
        }
        let start = self.check_bounds(offset, data.len())?;
        // SAFETY: as in read_at, plus `&mut self` excludes other writers
        // through this handle.
        unsafe {
            ptr::copy_nonoverlapping(data.as_ptr(), self.addr.as_ptr().add(start), data.len());
        }
        Ok(())
    }

    fn check_bounds(&self, offset: u64, len: usize) -> MmapResult<usize> {
        let end = offset
            .checked_add(len as u64)
            .filter(|end| *end <= self.len as u64)
            .ok_or_else(|| self.access_error(offset, len, "range outside mapping"))?;
        if end > self.backed_len as u64 {
            return Err(self.access_error(offset, len, "range past end of backing file"));
        }
        Ok(offset as usize)
    }

    fn access_error(&self, offset: u64, len: usize, reason: &'static str) -> MmapError {
        MmapError::Access {
            offset,
            len: len as u64,
            reason,
        }
    }

    /// Release the mapping now instead of at drop
    pub fn unmap(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // SAFETY: (addr, len) is exactly what mmap returned and nothing can
        // reach the region after this point.
        match unsafe { self.sys.munmap(self.base(), self.len) } {
            Ok(()) => log::debug!("unmapped {} bytes at {:p}", self.len, self.addr),
            Err(e) => log::warn!(
                "munmap of {} bytes at {:p} failed, {}",
                self.len,
                self.addr,
                e.code()
            ),
        }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("addr", &self.addr)
            .field("len", &self.len)
            .field("backed_len", &self.backed_len)
            .field("protection", &self.protection)
            .finish()
    }
}
