//! Sync Module
//!
//! Flushing dirty pages of a mapping back to its file.

use entities_memory_mapping::{ErrorCause, MmapError, MmapResult, SyncOptions};

use crate::mapping::Mapping;

impl Mapping {
    /// Flush `options.range` with the requested mode
    ///
    /// The default options flush `(offset 0, length 0)`; that pair is handed
    /// to msync unmodified.
    ///
    /// # Errors
    ///
    /// Returns `MmapError::Sync` with an argument cause if the range lies
    /// outside the mapping, or with the OS code if msync fails. The handle
    /// stays valid either way.
    pub fn sync(&self, options: SyncOptions) -> MmapResult<()> {
        let (offset, len) = options.range.resolve(self.len()).map_err(MmapError::Sync)?;
        log::trace!(
            "msync({:#x}+{}, {}, blocking={}, invalidate={})",
            self.base(),
            offset,
            len,
            options.mode.blocking,
            options.mode.invalidate
        );
        // SAFETY: the resolved range lies inside this live mapping.
        unsafe { self.sys().msync(self.base() + offset, len, options.mode) }
            .map_err(|e| MmapError::Sync(ErrorCause::Os(e.code())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::tests::{map_mock, mapped_mock, FAKE_BASE};
    use crate::request::MapRequest;
    use crate::syscalls::SyscallError;
    use entities_memory_mapping::SyncMode;
    use mockall::predicate::*;

    #[test]
    fn test_default_options_pass_zero_range() {
        let mut sys = mapped_mock(4096);
        sys.expect_msync()
            .with(eq(FAKE_BASE), eq(0usize), eq(SyncMode::new(false, false)))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mapping = map_mock(sys, &MapRequest::new(4096, 3, 1, 3)).unwrap().mapping;
        assert!(mapping.sync(SyncOptions::default()).is_ok());
    }

    #[test]
    fn test_blocking_invalidating_sub_range() {
        let mut sys = mapped_mock(8192);
        sys.expect_msync()
            .with(eq(FAKE_BASE + 4096), eq(4096usize), eq(SyncMode::new(true, true)))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mapping = map_mock(sys, &MapRequest::new(8192, 3, 1, 3)).unwrap().mapping;
        let options = SyncOptions::range(4096, 4096).blocking(true).invalidate(true);
        assert!(mapping.sync(options).is_ok());
    }

    #[test]
    fn test_range_outside_mapping() {
        let mut sys = mapped_mock(4096);
        sys.expect_msync().never();
        let mapping = map_mock(sys, &MapRequest::new(4096, 3, 1, 3)).unwrap().mapping;
        let err = mapping.sync(SyncOptions::range(0, 8192)).unwrap_err();
        assert!(matches!(err, MmapError::Sync(ErrorCause::Argument(_))));
    }

    #[test]
    fn test_failure_keeps_handle_usable() {
        let mut sys = mapped_mock(4096);
        let mut calls = 0;
        sys.expect_msync().times(2).returning(move |_, _, _| {
            calls += 1;
            if calls == 1 {
                Err(SyscallError::Failed(5))
            } else {
                Ok(())
            }
        });
        let mapping = map_mock(sys, &MapRequest::new(4096, 3, 1, 3)).unwrap().mapping;
        assert_eq!(
            mapping.sync(SyncOptions::default()),
            Err(MmapError::Sync(ErrorCause::Os(5)))
        );
        assert!(mapping.sync(SyncOptions::default()).is_ok());
    }
}
