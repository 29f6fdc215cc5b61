use std::io;
use std::num::NonZeroUsize;
use std::sync::OnceLock;

use nonempty::NonEmpty;

use crate::ProcessorId;
use crate::pal::Platform;

/// Fallback platform implementation for operating systems without native support.
///
/// This implementation provides graceful degradation on unsupported platforms:
///
/// * Processor count is determined via `std::thread::available_parallelism()`.
/// * Affinity operations succeed but do not actually pin threads to processors.
/// * Register reads fail with `ErrorKind::Unsupported`, which the sampling worker
///   contains as an ordinary read fault, so a pass still completes with the
///   no-reading sentinel for every processor.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetPlatform;

/// Singleton instance of `BuildTargetPlatform`, used by public API entry points to
/// hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

static PROCESSOR_COUNT: OnceLock<usize> = OnceLock::new();

impl BuildTargetPlatform {
    fn processor_count() -> usize {
        *PROCESSOR_COUNT.get_or_init(|| {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        })
    }

    fn all_processors() -> NonEmpty<ProcessorId> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "unrealistic to have more than u32::MAX processors"
        )]
        let processors = (0..Self::processor_count())
            .map(|index| index as ProcessorId)
            .collect::<Vec<_>>();

        NonEmpty::from_vec(processors)
            .expect("processor count is at least 1, so this cannot fail")
    }
}

impl Platform for BuildTargetPlatform {
    fn active_processor_count(&self) -> usize {
        Self::processor_count()
    }

    fn constrain_current_thread_to(
        &self,
        _processor: ProcessorId,
    ) -> io::Result<NonEmpty<ProcessorId>> {
        // Simulated pinning: report the full set as the prior scope.
        Ok(Self::all_processors())
    }

    fn restore_current_thread_affinity(
        &self,
        _processors: &NonEmpty<ProcessorId>,
    ) -> io::Result<()> {
        Ok(())
    }

    fn read_msr(&self, _processor: ProcessorId, _register: u32) -> io::Result<u64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "model-specific registers are not accessible on this platform",
        ))
    }

    fn processor_brand(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_at_least_one_processor() {
        assert!(BUILD_TARGET_PLATFORM.active_processor_count() >= 1);
    }

    #[test]
    fn register_reads_are_unsupported() {
        let error = BUILD_TARGET_PLATFORM
            .read_msr(0, 0x19C)
            .expect_err("fallback platform cannot read registers");

        assert_eq!(error.kind(), io::ErrorKind::Unsupported);
    }
}
