//! Map Request Module
//!
//! Per-call configuration for establishing a mapping.

/// Anonymous-mapping file descriptor sentinel
pub const ANONYMOUS_FD: i32 = -1;

/// Parameters for [`Mapping::map`](crate::Mapping::map)
///
/// `protection`, `flags` and `advise` are OS-defined integers and are passed
/// through untouched. `offset` defaults to 0 and `advise` to 0 (no hint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRequest {
    /// Mapping length in bytes
    pub size: u64,
    /// Bitwise-or of PROT_* values
    pub protection: i32,
    /// Bitwise-or of MAP_* values
    pub flags: i32,
    /// Backing file descriptor, or [`ANONYMOUS_FD`]
    pub fd: i32,
    /// Byte offset into the file
    pub offset: u64,
    /// MADV_* hint applied right after mapping; 0 means none
    pub advise: i32,
}

impl MapRequest {
    /// Create a request with the required parameters
    pub fn new(size: u64, protection: i32, flags: i32, fd: i32) -> Self {
        Self {
            size,
            protection,
            flags,
            fd,
            offset: 0,
            advise: 0,
        }
    }

    /// Set the file offset
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the advice applied after mapping
    pub fn advise(mut self, advise: i32) -> Self {
        self.advise = advise;
        self
    }
}
