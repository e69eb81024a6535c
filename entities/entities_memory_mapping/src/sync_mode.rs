//! Sync Mode Module
//!
//! What a flush should do, independent of how a platform spells it.

use crate::range::SubRange;

/// Flush behaviour for one msync call
///
/// `blocking` picks a synchronous flush, otherwise the flush is only
/// scheduled. The two are exclusive by construction: a single bool selects
/// exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncMode {
    /// Wait until the data reaches storage
    pub blocking: bool,
    /// Invalidate other mappings of the same file
    pub invalidate: bool,
}

impl SyncMode {
    /// Create a new sync mode
    pub fn new(blocking: bool, invalidate: bool) -> Self {
        Self { blocking, invalidate }
    }
}

/// Per-call flush options
///
/// The default flushes `(offset 0, length 0)` asynchronously without
/// invalidation, which is passed through to the OS untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOptions {
    /// Byte range to flush
    pub range: SubRange,
    /// Flush mode
    pub mode: SyncMode,
}

impl SyncOptions {
    /// Flush the given range
    pub fn range(offset: u64, len: u64) -> Self {
        Self {
            range: SubRange::new(offset, len),
            mode: SyncMode::default(),
        }
    }

    /// Wait for completion
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.mode.blocking = blocking;
        self
    }

    /// Invalidate other cached views
    pub fn invalidate(mut self, invalidate: bool) -> Self {
        self.mode.invalidate = invalidate;
        self
    }
}
