//! API Facades Layer
//!
//! Provides the host-facing entry points for memory-mapped I/O: `map`,
//! `advise`, `incore`, `sync` and the exported constants table.
//!
//! Facades accept loosely typed [`HostValue`] argument lists, validate their
//! count and kind before any system call, and then call the use cases layer
//! through the Unix adapter.

pub mod host_value;
#[cfg(unix)]
pub mod mmap_facades;

pub use host_value::HostValue;
#[cfg(unix)]
pub use mmap_facades::*;
