//! Entities Layer: Memory Mapping
//!
//! Provides the platform-independent data model behind memory-mapped I/O.
//! Nothing in this crate talks to the operating system; it only describes
//! regions, ranges, page accounting and the errors the outer layers report.
//!
//! ## Overview
//!
//! The `entities_memory_mapping` crate is part of the entities layer in the
//! CLEAN architecture layout of the workspace. The use cases layer builds the
//! owned mapping handle on top of these types, and the adapters layer fills
//! them in from real system calls.
//!
//! ## Modules
//!
//! - **[`range`](range/index.html)**: Sub-range resolution against a mapping length
//! - **[`pages`](pages/index.html)**: Page counting and residency bitmap reduction
//! - **[`sync_mode`](sync_mode/index.html)**: Flush mode and per-call flush options
//! - **[`error`](error/index.html)**: The `MmapError` taxonomy
//!
//! ## Usage
//!
//! ```rust
//! use entities_memory_mapping::{page_count, ResidencyReport, SubRange};
//!
//! assert_eq!(page_count(8193, 4096), 3);
//!
//! let report = ResidencyReport::from_status_bytes(&[1, 0, 1]).unwrap();
//! assert_eq!(report.as_pair(), (1, 2));
//!
//! let (offset, len) = SubRange::new(4096, 100).resolve(8192).unwrap();
//! assert_eq!((offset, len), (4096, 100));
//! ```
//!
//! ## See Also
//!
//! - [`usecases_memory_mapping`](../../usecases/usecases_memory_mapping/index.html): Mapping lifecycle and operations
//! - [`adapters_system_integration_unix`](../../adapters/adapters_system_integration_unix/index.html): Unix system calls

/*
 * %CopyrightBegin%
 *
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright Lee Barney 2025. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 * %CopyrightEnd%
 */

pub mod error;
pub mod pages;
pub mod range;
pub mod sync_mode;

pub use error::{ErrorCause, MmapError, MmapResult};
pub use pages::{page_count, ResidencyReport};
pub use range::SubRange;
pub use sync_mode::{SyncMode, SyncOptions};
