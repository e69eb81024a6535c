//! Advise Module
//!
//! Access-pattern hints for a mapping or a sub-range of it. Advice only
//! affects kernel read-ahead and caching; a failure is still reported so the
//! caller can decide whether it matters.

use entities_memory_mapping::range::resolve_or_whole;
use entities_memory_mapping::{ErrorCause, MmapError, MmapResult, SubRange};

use crate::mapping::Mapping;

impl Mapping {
    /// Apply `advice` to the whole mapping (`range = None`) or a sub-range
    ///
    /// `advice` is an OS-defined MADV_* value and is passed through as is.
    ///
    /// # Errors
    ///
    /// Returns `MmapError::Advice` with an argument cause if the range lies
    /// outside the mapping, or with the OS code if madvise fails.
    pub fn advise(&self, range: Option<SubRange>, advice: i32) -> MmapResult<()> {
        let (offset, len) = resolve_or_whole(range, self.len()).map_err(MmapError::Advice)?;
        log::trace!("madvise({:#x}+{}, {}, {})", self.base(), offset, len, advice);
        // SAFETY: the resolved range lies inside this live mapping.
        unsafe { self.sys().madvise(self.base() + offset, len, advice) }
            .map_err(|e| MmapError::Advice(ErrorCause::Os(e.code())))
    }
}
