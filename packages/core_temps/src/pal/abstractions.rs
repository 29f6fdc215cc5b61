use std::fmt::Debug;
use std::io;

use nonempty::NonEmpty;

use crate::ProcessorId;

/// The operations the sampling engine requires from the operating system.
///
/// All platform calls go through this trait, enabling them to be mocked. Register reads
/// and affinity changes are fallible operations here; in particular, reading a register
/// the processor does not implement surfaces as an `io::Error` that the worker contains
/// rather than propagates.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// The number of logical processors currently online, across all processor groups
    /// the host exposes. Zero means enumeration failed or nothing is online.
    fn active_processor_count(&self) -> usize;

    /// Narrows the calling thread's affinity to exactly one processor, returning the
    /// previously allowed set so the caller can restore it afterwards.
    fn constrain_current_thread_to(
        &self,
        processor: ProcessorId,
    ) -> io::Result<NonEmpty<ProcessorId>>;

    /// Restores a previously captured affinity set for the calling thread.
    fn restore_current_thread_affinity(
        &self,
        processors: &NonEmpty<ProcessorId>,
    ) -> io::Result<()>;

    /// Reads a model-specific register belonging to the given processor.
    fn read_msr(&self, processor: ProcessorId, register: u32) -> io::Result<u64>;

    /// A human-readable description of the installed processor model, if the platform
    /// exposes one.
    fn processor_brand(&self) -> Option<String>;
}
