//! Use Cases Layer: Memory Mapping
//!
//! Provides the memory-mapped I/O operations: establishing a mapping,
//! advising the kernel, querying page residency, flushing dirty pages, and
//! releasing the mapping exactly once.
//!
//! ## Overview
//!
//! The `usecases_memory_mapping` crate is part of the use cases layer in the
//! CLEAN architecture layout of the workspace. It owns the [`Mapping`] handle
//! and all the rules around it, but never calls the OS directly: every system
//! call goes through the [`MmanSyscalls`] trait, which the adapters layer
//! implements on top of `libc`.
//!
//! ## Operations
//!
//! - **[`mapping`](mapping/index.html)**: `Mapping::map`, byte access and the
//!   release path (`Drop` / `Mapping::unmap`)
//! - **[`advise`](advise/index.html)**: whole-mapping or sub-range madvise
//! - **[`incore`](incore/index.html)**: page residency via mincore
//! - **[`sync`](sync/index.html)**: msync with blocking/invalidate options
//! - **[`request`](request/index.html)**: `MapRequest`, the per-call mapping configuration
//! - **[`syscalls`](syscalls/index.html)**: the OS seam
//!
//! ## Architecture
//!
//! All operations are synchronous and hold no state besides the handle. A
//! handle may be shared between threads; each call issues its own system
//! call over the recorded `(address, length)`.
//!
//! ## See Also
//!
//! - [`entities_memory_mapping`](../../entities/entities_memory_mapping/index.html): Data model and errors
//! - [`adapters_system_integration_unix`](../../adapters/adapters_system_integration_unix/index.html): `libc` backend

pub mod advise;
pub mod incore;
pub mod mapping;
pub mod request;
pub mod sync;
pub mod syscalls;

pub use mapping::{MapOutcome, Mapping};
pub use request::MapRequest;
pub use syscalls::{AccessRights, MmanSyscalls, SyscallError};

pub use entities_memory_mapping::{
    ErrorCause, MmapError, MmapResult, ResidencyReport, SubRange, SyncMode, SyncOptions,
};
