//! Integration tests for adapters_system_integration_unix crate
//!
//! These tests map real files and anonymous memory through the `libc`
//! backend and check the observable kernel behaviour.

#![cfg(unix)]

use std::fs;
use std::io::Write;
use std::os::unix::io::AsRawFd;

use adapters_system_integration_unix::*;
use entities_memory_mapping::{ErrorCause, MmapError, SubRange, SyncOptions};
use usecases_memory_mapping::{MapRequest, Mapping};

fn page() -> usize {
    *PAGE_SIZE
}

fn backing_file(len: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![0u8; len]).unwrap();
    file.flush().unwrap();
    file
}

fn map_shared(file: &tempfile::NamedTempFile, len: usize) -> Mapping {
    let request = MapRequest::new(
        len as u64,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_SHARED,
        file.as_file().as_raw_fd(),
    );
    let outcome = unsafe { map(&request) }.unwrap();
    outcome.advice.unwrap();
    outcome.mapping
}

#[test]
fn test_length_matches_request() {
    let file = backing_file(3 * page());
    for len in [1, page() - 1, page(), 2 * page() + 17] {
        let mapping = map_shared(&file, len);
        assert_eq!(mapping.len(), len);
    }
}

#[test]
fn test_sync_round_trip_through_file() {
    let file = backing_file(2 * page());
    let mut mapping = map_shared(&file, 2 * page());
    let pattern: Vec<u8> = (0..2 * page()).map(|i| (i % 251) as u8).collect();
    mapping.write_at(0, &pattern).unwrap();

    let options = SyncOptions::range(0, 2 * page() as u64).blocking(true);
    mapping.sync(options).unwrap();

    let on_disk = fs::read(file.path()).unwrap();
    assert_eq!(on_disk, pattern);
}

#[test]
fn test_async_invalidating_sync_succeeds() {
    let file = backing_file(page());
    let mut mapping = map_shared(&file, page());
    mapping.write_at(10, b"abc").unwrap();
    let options = SyncOptions::range(0, page() as u64).invalidate(true);
    assert!(mapping.sync(options).is_ok());
}

#[test]
fn test_default_sync_passes_zero_range() {
    let file = backing_file(page());
    let mapping = map_shared(&file, page());
    // (0, 0) reaches msync unmodified; Linux treats it as a no-op
    #[cfg(target_os = "linux")]
    assert!(mapping.sync(SyncOptions::default()).is_ok());
    #[cfg(not(target_os = "linux"))]
    let _ = mapping.sync(SyncOptions::default());
}

#[test]
fn test_sync_range_outside_mapping() {
    let file = backing_file(page());
    let mapping = map_shared(&file, page());
    let err = mapping.sync(SyncOptions::range(page() as u64, 1)).unwrap_err();
    assert!(matches!(err, MmapError::Sync(ErrorCause::Argument(_))));
}

#[test]
fn test_three_page_residency_scenario() {
    let file = backing_file(3 * page());
    let mapping = map_shared(&file, 3 * page());
    let mut first = [0u8; 1];
    mapping.read_at(0, &mut first).unwrap();

    let (not_resident, resident) = mapping.incore().unwrap().as_pair();
    // Read-ahead and the page cache may bring in more than the touched page
    assert!((1..=3).contains(&resident), "resident = {}", resident);
    assert_eq!(not_resident + resident, 3);
}

#[test]
fn test_partial_trailing_page_counts() {
    let file = backing_file(3 * page());
    let mapping = map_shared(&file, 2 * page() + 1);
    assert_eq!(mapping.incore().unwrap().total(), 3);
}

#[test]
fn test_untouched_anonymous_accounting_conserved() {
    let request = MapRequest::new(
        5 * page() as u64,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANON,
        -1,
    );
    let mapping = unsafe { map(&request) }.unwrap().mapping;
    assert_eq!(mapping.incore().unwrap().total(), 5);
}

#[cfg(target_os = "linux")]
#[test]
fn test_populated_mapping_fully_resident() {
    let file = backing_file(4 * page() + 100);
    let request = MapRequest::new(
        (4 * page() + 100) as u64,
        libc::PROT_READ,
        libc::MAP_SHARED | libc::MAP_POPULATE,
        file.as_file().as_raw_fd(),
    );
    let mapping = unsafe { map(&request) }.unwrap().mapping;
    assert_eq!(mapping.incore().unwrap().as_pair(), (0, 5));
}

#[test]
fn test_invalid_advice_leaves_mapping_intact() {
    let file = backing_file(2 * page());
    let request = MapRequest::new(
        2 * page() as u64,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_SHARED,
        file.as_file().as_raw_fd(),
    )
    .advise(0x7fff);
    let (mut mapping, advice) = unsafe { map(&request) }.unwrap().into_parts();
    assert_eq!(advice, Err(MmapError::Advice(ErrorCause::Os(libc::EINVAL))));

    mapping.write_at(page() as u64, b"after advice").unwrap();
    let mut buf = [0u8; 12];
    mapping.read_at(page() as u64, &mut buf).unwrap();
    assert_eq!(&buf, b"after advice");
    assert!(mapping.sync(SyncOptions::range(0, 2 * page() as u64).blocking(true)).is_ok());
}

#[test]
fn test_advise_whole_and_sub_range() {
    let file = backing_file(4 * page());
    let mapping = map_shared(&file, 4 * page());
    assert!(mapping.advise(None, libc::MADV_SEQUENTIAL).is_ok());
    let range = SubRange::new(page() as u64, 2 * page() as u64);
    assert!(mapping.advise(Some(range), libc::MADV_WILLNEED).is_ok());
    assert!(mapping.advise(Some(range), libc::MADV_NORMAL).is_ok());

    let err = mapping.advise(Some(SubRange::new(0, 5 * page() as u64)), libc::MADV_RANDOM);
    assert!(matches!(err, Err(MmapError::Advice(ErrorCause::Argument(_)))));
}

#[test]
fn test_bad_fd_is_mapping_error() {
    let request = MapRequest::new(page() as u64, libc::PROT_READ, libc::MAP_SHARED, -1);
    let err = unsafe { map(&request) }.unwrap_err();
    assert_eq!(err, MmapError::Mapping(ErrorCause::Os(libc::EBADF)));
}

#[test]
fn test_private_mapping_does_not_reach_file() {
    let file = backing_file(page());
    let request = MapRequest::new(
        page() as u64,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE,
        file.as_file().as_raw_fd(),
    );
    let mut mapping = unsafe { map(&request) }.unwrap().mapping;
    mapping.write_at(0, b"private").unwrap();
    mapping.sync(SyncOptions::range(0, page() as u64).blocking(true)).unwrap();
    drop(mapping);
    assert_eq!(&fs::read(file.path()).unwrap()[..7], &[0u8; 7]);
}

#[test]
fn test_read_only_mapping_refuses_writes() {
    let file = backing_file(page());
    let request = MapRequest::new(
        page() as u64,
        libc::PROT_READ,
        libc::MAP_SHARED,
        file.as_file().as_raw_fd(),
    );
    let mut mapping = unsafe { map(&request) }.unwrap().mapping;
    assert!(matches!(mapping.write_at(0, b"x"), Err(MmapError::Access { .. })));
}

#[test]
fn test_mapping_at_file_offset() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut contents = vec![0u8; 2 * page()];
    contents[page()..page() + 5].copy_from_slice(b"hello");
    file.write_all(&contents).unwrap();
    file.flush().unwrap();

    let request = MapRequest::new(
        page() as u64,
        libc::PROT_READ,
        libc::MAP_SHARED,
        file.as_file().as_raw_fd(),
    )
    .offset(page() as u64);
    let mapping = unsafe { map(&request) }.unwrap().mapping;
    let mut buf = [0u8; 5];
    mapping.read_at(0, &mut buf).unwrap();
    assert_eq!(&buf, b"hello");
}

#[test]
fn test_access_past_end_of_file_refused() {
    let file = backing_file(page());
    let request = MapRequest::new(
        3 * page() as u64,
        libc::PROT_READ,
        libc::MAP_SHARED,
        file.as_file().as_raw_fd(),
    );
    let mapping = unsafe { map(&request) }.unwrap().mapping;
    assert_eq!(mapping.len(), 3 * page());
    assert_eq!(mapping.backed_len(), page());

    let mut byte = [0u8; 1];
    let err = mapping.read_at(2 * page() as u64, &mut byte).unwrap_err();
    assert!(matches!(err, MmapError::Access { .. }));
    assert!(mapping.read_at(page() as u64 - 1, &mut [0u8; 2]).is_err());
    mapping.read_at(page() as u64 - 1, &mut byte).unwrap();

    // residency and advice still cover the whole mapping
    assert_eq!(mapping.incore().unwrap().total(), 3);
}

#[test]
fn test_anonymous_mapping_fully_accessible() {
    let request = MapRequest::new(
        2 * page() as u64,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANON,
        -1,
    );
    let mut mapping = unsafe { map(&request) }.unwrap().mapping;
    assert_eq!(mapping.backed_len(), 2 * page());
    mapping.write_at(2 * page() as u64 - 3, b"end").unwrap();
}
