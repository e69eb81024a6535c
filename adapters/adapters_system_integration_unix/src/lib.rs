//! Adapters Layer: Unix System Integration
//!
//! Provides the Unix implementation of the memory-mapping system calls and
//! the table of OS-defined constants callers compose their arguments from.
//! Depends on the Entities and Use Cases layers.

#[cfg(unix)]
pub mod constants;
#[cfg(unix)]
pub mod mman;

#[cfg(unix)]
pub use constants::{capabilities, is_available, lookup, PAGE_SIZE};
#[cfg(unix)]
pub use mman::{backend, map, msync_flags, LibcMman};
