//! Sub-Range Module
//!
//! Byte ranges relative to the start of a mapping. Advise and sync accept
//! either the whole mapping or one of these; both shapes resolve to a single
//! `(offset, length)` pair that is known to lie inside the mapped span.

use crate::error::ErrorCause;

/// A byte range relative to the start of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubRange {
    /// Offset from the mapping base
    pub offset: u64,
    /// Length in bytes
    pub len: u64,
}

impl SubRange {
    /// Create a new sub-range
    pub fn new(offset: u64, len: u64) -> Self {
        Self { offset, len }
    }

    /// The range covering a whole mapping of `mapping_len` bytes
    pub fn whole(mapping_len: usize) -> Self {
        Self {
            offset: 0,
            len: mapping_len as u64,
        }
    }

    /// Resolve against a mapping length
    ///
    /// A zero-length range is valid anywhere inside the mapping, including
    /// `(0, 0)`; the OS decides what it means.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCause::Argument` if the range overflows or extends past
    /// the end of the mapping.
    pub fn resolve(&self, mapping_len: usize) -> Result<(usize, usize), ErrorCause> {
        let end = self
            .offset
            .checked_add(self.len)
            .ok_or_else(|| ErrorCause::argument("offset + length overflows"))?;
        if end > mapping_len as u64 {
            return Err(ErrorCause::argument(format!(
                "range {}..{} outside mapping of {} bytes",
                self.offset, end, mapping_len
            )));
        }
        // end <= mapping_len, so both halves fit in usize
        Ok((self.offset as usize, self.len as usize))
    }
}

/// Resolve an optional range, `None` meaning the whole mapping
pub fn resolve_or_whole(
    range: Option<SubRange>,
    mapping_len: usize,
) -> Result<(usize, usize), ErrorCause> {
    range
        .unwrap_or_else(|| SubRange::whole(mapping_len))
        .resolve(mapping_len)
}
