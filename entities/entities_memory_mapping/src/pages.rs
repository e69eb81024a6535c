//! Page Accounting Module
//!
//! Page-granularity arithmetic and the reduction of a residency bitmap (one
//! status byte per page, as returned by mincore) into two counters.

use crate::error::ErrorCause;

/// Number of pages needed to cover `len` bytes
///
/// A trailing partial page counts as a whole page. `page_size` must be
/// non-zero.
pub fn page_count(len: usize, page_size: usize) -> usize {
    debug_assert!(page_size > 0);
    len / page_size + usize::from(len % page_size != 0)
}

/// Aggregate residency of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResidencyReport {
    /// Pages that would fault on access
    pub not_resident: u32,
    /// Pages currently backed by physical memory
    pub resident: u32,
}

impl ResidencyReport {
    /// Reduce a per-page status vector
    ///
    /// Bit 0 of each byte marks the page as resident; the remaining bits are
    /// platform-specific and ignored.
    ///
    /// # Errors
    ///
    /// Fails when either counter would not fit a `u32`.
    pub fn from_status_bytes(status: &[u8]) -> Result<Self, ErrorCause> {
        let resident = status.iter().filter(|byte| *byte & 0x1 != 0).count();
        Self::from_counts((status.len() - resident) as u64, resident as u64)
    }

    /// Build a report from page counts, refusing counts beyond `u32::MAX`
    pub fn from_counts(not_resident: u64, resident: u64) -> Result<Self, ErrorCause> {
        let narrow = |pages: u64| {
            u32::try_from(pages).map_err(|_| {
                ErrorCause::argument(format!("{} pages exceed the residency counters", pages))
            })
        };
        Ok(Self {
            not_resident: narrow(not_resident)?,
            resident: narrow(resident)?,
        })
    }

    /// `(pages_not_resident, pages_resident)`, the order callers depend on
    pub fn as_pair(&self) -> (u32, u32) {
        (self.not_resident, self.resident)
    }

    /// Total pages accounted for
    pub fn total(&self) -> u64 {
        u64::from(self.not_resident) + u64::from(self.resident)
    }
}

impl From<ResidencyReport> for (u32, u32) {
    fn from(report: ResidencyReport) -> Self {
        report.as_pair()
    }
}
