//! Memory Mapping API Facades
//!
//! Entry points for a host runtime. Each facade checks argument count and
//! kind the way the host binding always has, fills in defaults for optional
//! arguments, and hands a fixed-shape call to the use cases layer.
//!
//! | Facade | Arguments |
//! |---|---|
//! | `map` | `size, protection, flags, fd [, offset [, advise]]` |
//! | `advise` | `buffer, advice` or `buffer, offset, length, advice` |
//! | `incore` | `buffer` |
//! | `sync` | `buffer [, offset [, length [, blocking [, invalidate]]]]` |

use std::collections::BTreeMap;

use adapters_system_integration_unix as unix;
use entities_memory_mapping::{MmapError, MmapResult, SubRange, SyncOptions};
use usecases_memory_mapping::{MapOutcome, MapRequest};

use crate::host_value::{Args, HostValue};

/// Create a mapping
///
/// The returned outcome always carries a valid handle; a failed advice hint
/// is reported in `MapOutcome::advice`.
///
/// # Errors
///
/// `MmapError::Mapping` for malformed arguments or a failed mmap. An
/// `MmapError::Advice` for the optional `advise` argument does not fail the
/// call; it arrives in `MapOutcome::advice` next to the usable handle.
///
/// # Safety
///
/// A file behind `fd` must not be truncated below the mapped range while
/// the handle is alive; see `Mapping::map`.
pub unsafe fn map(args: &[HostValue<'_>]) -> MmapResult<MapOutcome> {
    let args = Args::new("map", args, MmapError::Mapping);
    if !(4..=6).contains(&args.len()) {
        return Err(args.fail(
            "map() takes 4, 5 or 6 arguments: (size :int, protection :int, flags :int, fd :int [, offset :int [, advise :int]])."
                .to_string(),
        ));
    }

    let size = args.integer(0, "size")?;
    let protection = args.int32(1, "protection_flags")?;
    let flags = args.int32(2, "flags")?;
    let fd = args.int32(3, "fd")?;
    let offset = args.optional_integer(4, "offset")?.unwrap_or(0);
    let advise = match args.optional_integer(5, "advise")? {
        Some(value) => args.narrow(5, "advise", value)?,
        None => 0,
    };

    let request = MapRequest::new(args.unsigned(0, "size", size)?, protection, flags, fd)
        .offset(args.unsigned(4, "offset", offset)?)
        .advise(advise);
    unix::map(&request)
}

/// Advise the kernel about a mapping or part of it
///
/// # Errors
///
/// `MmapError::Advice` for malformed arguments or a rejected madvise.
pub fn advise(args: &[HostValue<'_>]) -> MmapResult<()> {
    let args = Args::new("advise", args, MmapError::Advice);
    let mapping = match args.len() {
        2 | 4 => args.buffer(0)?,
        _ => {
            return Err(args.fail(
                "advise() takes 2 or 4 arguments: (buffer :Buffer, advise :int) | (buffer :Buffer, offset :int, length :int, advise :int)."
                    .to_string(),
            ))
        }
    };

    if args.len() == 2 {
        let advice = args.int32(1, "advise")?;
        return mapping.advise(None, advice);
    }

    let offset = args.integer(1, "offset")?;
    let length = args.integer(2, "length")?;
    let advice = args.int32(3, "advise")?;
    let range = SubRange::new(
        args.unsigned(1, "offset", offset)?,
        args.unsigned(2, "length", length)?,
    );
    mapping.advise(Some(range), advice)
}

/// Count `(pages_not_resident, pages_resident)` of a mapping
///
/// # Errors
///
/// `MmapError::Unsupported` where mincore is not implemented,
/// `MmapError::ResidencyQuery` otherwise.
pub fn incore(args: &[HostValue<'_>]) -> MmapResult<(u32, u32)> {
    let args = Args::new("incore", args, MmapError::ResidencyQuery);
    if args.len() != 1 {
        return Err(args.fail("incore() takes 1 argument: (buffer :Buffer) .".to_string()));
    }
    let mapping = args.buffer(0)?;
    Ok(mapping.incore()?.as_pair())
}

/// Flush a mapping or part of it
///
/// Omitted arguments default to offset 0, length 0, non-blocking and no
/// invalidation.
///
/// # Errors
///
/// `MmapError::Sync` for malformed arguments or a failed msync.
pub fn sync(args: &[HostValue<'_>]) -> MmapResult<()> {
    let args = Args::new("sync", args, MmapError::Sync);
    if !(1..=5).contains(&args.len()) {
        return Err(args.fail(
            "sync() takes 1 to 5 arguments: (buffer :Buffer [, offset :int [, length :int [, blocking_sync :bool [, invalidate_pages_and_signal_refresh_to_consumers :bool]]]])."
                .to_string(),
        ));
    }
    let mapping = args.buffer(0)?;
    let offset = args.optional_integer(1, "offset")?.unwrap_or(0);
    let length = args.optional_integer(2, "length")?.unwrap_or(0);
    let blocking = args.optional_bool(3, "blocking_sync")?.unwrap_or(false);
    let invalidate = args.optional_bool(4, "invalidate")?.unwrap_or(false);

    let options = SyncOptions::range(
        args.unsigned(1, "offset", offset)?,
        args.unsigned(2, "length", length)?,
    )
    .blocking(blocking)
    .invalidate(invalidate);
    mapping.sync(options)
}

/// The constants table published to the host, `PAGESIZE` included
pub fn exports() -> &'static BTreeMap<&'static str, i64> {
    unix::capabilities()
}
