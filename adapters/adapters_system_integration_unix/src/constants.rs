//! Constants Module (Unix-specific)
//!
//! The OS-defined values callers compose into protection, flag and advice
//! arguments, published as a capability table keyed by name. Values are
//! taken from `libc` unchanged. Flags that only exist on some platforms are
//! only present in the table where the platform defines them.

use std::collections::BTreeMap;

/// Used only when sysconf cannot report a page size
const FALLBACK_PAGE_SIZE: usize = 4096;

fn query_page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        log::warn!(
            "sysconf(_SC_PAGESIZE) failed, assuming {} bytes",
            FALLBACK_PAGE_SIZE
        );
        FALLBACK_PAGE_SIZE
    }
}

fn build_table() -> BTreeMap<&'static str, i64> {
    let mut table = BTreeMap::new();

    table.insert("PROT_READ", libc::PROT_READ as i64);
    table.insert("PROT_WRITE", libc::PROT_WRITE as i64);
    table.insert("PROT_EXEC", libc::PROT_EXEC as i64);
    table.insert("PROT_NONE", libc::PROT_NONE as i64);

    table.insert("MAP_SHARED", libc::MAP_SHARED as i64);
    table.insert("MAP_PRIVATE", libc::MAP_PRIVATE as i64);
    table.insert("MAP_ANONYMOUS", libc::MAP_ANON as i64);
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        table.insert("MAP_NONBLOCK", libc::MAP_NONBLOCK as i64);
        table.insert("MAP_POPULATE", libc::MAP_POPULATE as i64);
    }

    table.insert("MADV_NORMAL", libc::MADV_NORMAL as i64);
    table.insert("MADV_RANDOM", libc::MADV_RANDOM as i64);
    table.insert("MADV_SEQUENTIAL", libc::MADV_SEQUENTIAL as i64);
    table.insert("MADV_WILLNEED", libc::MADV_WILLNEED as i64);
    table.insert("MADV_DONTNEED", libc::MADV_DONTNEED as i64);

    table.insert("MS_ASYNC", libc::MS_ASYNC as i64);
    table.insert("MS_SYNC", libc::MS_SYNC as i64);
    table.insert("MS_INVALIDATE", libc::MS_INVALIDATE as i64);

    table.insert("PAGESIZE", *PAGE_SIZE as i64);
    table
}

lazy_static::lazy_static! {
    /// Platform page size, queried once
    pub static ref PAGE_SIZE: usize = query_page_size();

    static ref CAPABILITIES: BTreeMap<&'static str, i64> = build_table();
}

/// Every constant this platform provides
pub fn capabilities() -> &'static BTreeMap<&'static str, i64> {
    &CAPABILITIES
}

/// Value of a named constant, if the platform defines it
pub fn lookup(name: &str) -> Option<i64> {
    CAPABILITIES.get(name).copied()
}

/// Whether the platform defines a named constant
pub fn is_available(name: &str) -> bool {
    CAPABILITIES.contains_key(name)
}
