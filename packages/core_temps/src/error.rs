use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that prevent a sampling pass from being attempted at all.
///
/// Per-processor failures are deliberately not represented here: a register read fault
/// or a worker thread that could not be spawned is recorded in the returned
/// [`PassReport`][crate::PassReport] and does not fail the pass, whose contract is
/// "attempt every processor, report what happened".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PassError {
    /// The platform reported zero online logical processors, so there is nothing to
    /// sample. No worker is spawned in this case.
    #[error("no active processors found")]
    NoProcessorsFound,

    /// Storage for the per-processor sampling slots could not be allocated.
    #[error("failed to allocate sampling slots for {processor_count} processors")]
    AllocationFailure {
        /// The processor count the allocation was sized for.
        processor_count: usize,

        /// The underlying allocator failure.
        #[source]
        source: TryReserveError,
    },
}

/// A specialized `Result` type for sampling pass operations, returning the crate's
/// [`PassError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, PassError>;

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(PassError: Send, Sync, Debug);

    #[test]
    fn no_processors_is_error() {
        let result: Result<()> = Err(PassError::NoProcessorsFound);
        assert!(result.is_err());
    }

    #[test]
    fn allocation_failure_names_the_count() {
        let mut storage = Vec::<u8>::new();
        let source = storage
            .try_reserve_exact(usize::MAX)
            .expect_err("usize::MAX bytes can never be reserved");

        let error = PassError::AllocationFailure {
            processor_count: 16,
            source,
        };

        assert!(error.to_string().contains("16"));
    }
}
