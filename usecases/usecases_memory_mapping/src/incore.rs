//! Incore Module
//!
//! Page residency of a mapping. mincore fills one status byte per page and
//! the bitmap is reduced to `(pages_not_resident, pages_resident)`.

use entities_memory_mapping::{page_count, ErrorCause, MmapError, MmapResult, ResidencyReport};

use crate::mapping::Mapping;
use crate::syscalls::SyscallError;

impl Mapping {
    /// Count resident and non-resident pages
    ///
    /// A trailing partial page counts as one more page, so the two counters
    /// always add up to `ceil(len / page_size)`. Mappings of more than
    /// `u32::MAX` pages cannot be reported.
    ///
    /// # Errors
    ///
    /// Returns `MmapError::Unsupported` when the platform does not implement
    /// mincore, and `MmapError::ResidencyQuery` for any other failure,
    /// including a page count the counters cannot hold.
    pub fn incore(&self) -> MmapResult<ResidencyReport> {
        let page_size = self.sys().page_size();
        if page_size == 0 {
            return Err(MmapError::ResidencyQuery(ErrorCause::argument(
                "page size is zero",
            )));
        }
        let pages = page_count(self.len(), page_size);
        if u32::try_from(pages).is_err() {
            return Err(MmapError::ResidencyQuery(ErrorCause::argument(format!(
                "{} pages exceed the residency counters",
                pages
            ))));
        }
        let mut status = vec![0u8; pages];

        // SAFETY: the whole mapping is live and `status` holds one byte per
        // page of it.
        unsafe { self.sys().mincore(self.base(), self.len(), &mut status) }.map_err(|e| match e {
            SyscallError::NotImplemented(code) => MmapError::Unsupported { code },
            SyscallError::Failed(code) => MmapError::ResidencyQuery(ErrorCause::Os(code)),
        })?;

        let report = ResidencyReport::from_status_bytes(&status).map_err(MmapError::ResidencyQuery)?;
        log::trace!(
            "mincore({:#x}, {}): {} resident, {} not resident",
            self.base(),
            self.len(),
            report.resident,
            report.not_resident
        );
        Ok(report)
    }
}
