//! Error Module
//!
//! Error taxonomy shared by every layer. Each variant names the operation
//! that failed; the [`ErrorCause`] says whether the OS rejected the call or
//! the arguments were refused before any call was made.

use std::fmt;

/// Why an operation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCause {
    /// The system call reported failure with this errno
    Os(i32),
    /// Arguments were rejected before reaching the OS
    Argument(String),
}

impl ErrorCause {
    /// Shorthand for an argument-shape or range failure
    pub fn argument(message: impl Into<String>) -> Self {
        ErrorCause::Argument(message.into())
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCause::Os(code) => write!(f, "{}", code),
            ErrorCause::Argument(msg) => write!(f, "{}", msg),
        }
    }
}

/// Memory mapping errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MmapError {
    /// Establishing the mapping failed (mmap)
    Mapping(ErrorCause),
    /// Applying an access-pattern hint failed (madvise)
    Advice(ErrorCause),
    /// The residency query is not implemented on this platform
    Unsupported {
        /// errno reported by the OS (ENOSYS)
        code: i32,
    },
    /// The residency query failed for another reason (mincore)
    ResidencyQuery(ErrorCause),
    /// Flushing dirty pages failed (msync)
    Sync(ErrorCause),
    /// Byte access outside the mapping or against its protection
    Access {
        /// Requested offset
        offset: u64,
        /// Requested length
        len: u64,
        /// What was wrong with the request
        reason: &'static str,
    },
}

impl MmapError {
    /// The raw OS error code, if the failure came from a system call
    pub fn os_code(&self) -> Option<i32> {
        match self {
            MmapError::Mapping(ErrorCause::Os(code))
            | MmapError::Advice(ErrorCause::Os(code))
            | MmapError::ResidencyQuery(ErrorCause::Os(code))
            | MmapError::Sync(ErrorCause::Os(code)) => Some(*code),
            MmapError::Unsupported { code } => Some(*code),
            _ => None,
        }
    }

    /// Whether the failure was raised before any system call was attempted
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            MmapError::Mapping(ErrorCause::Argument(_))
                | MmapError::Advice(ErrorCause::Argument(_))
                | MmapError::ResidencyQuery(ErrorCause::Argument(_))
                | MmapError::Sync(ErrorCause::Argument(_))
                | MmapError::Access { .. }
        )
    }
}

impl fmt::Display for MmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MmapError::Mapping(cause) => write!(f, "mmap failed, {}", cause),
            MmapError::Advice(cause) => write!(f, "madvise() failed, {}", cause),
            MmapError::Unsupported { .. } => write!(f, "mincore() not implemented"),
            MmapError::ResidencyQuery(cause) => write!(f, "mincore() failed, {}", cause),
            MmapError::Sync(cause) => write!(f, "msync() failed, {}", cause),
            MmapError::Access { offset, len, reason } => {
                write!(f, "access of {} bytes at offset {} refused: {}", len, offset, reason)
            }
        }
    }
}

impl std::error::Error for MmapError {}

/// Result type for memory mapping operations
pub type MmapResult<T> = Result<T, MmapError>;
