use std::io;

use nonempty::NonEmpty;

use crate::ProcessorId;
use crate::pal::{Platform, PlatformFacade};

/// Scoped narrowing of the calling thread's processor affinity.
///
/// Entering the scope constrains the thread to exactly one processor; dropping it
/// restores whatever affinity applied before, on every exit path. The sampling region
/// must never leave the thread's affinity narrowed after it returns or fails.
#[derive(Debug)]
pub(crate) struct AffinityScope<'p> {
    platform: &'p PlatformFacade,
    prior: Option<NonEmpty<ProcessorId>>,
}

impl<'p> AffinityScope<'p> {
    /// Constrains the calling thread to the given processor until the returned scope
    /// is dropped.
    pub(crate) fn enter(
        platform: &'p PlatformFacade,
        processor: ProcessorId,
    ) -> io::Result<Self> {
        let prior = platform.constrain_current_thread_to(processor)?;

        Ok(Self {
            platform,
            prior: Some(prior),
        })
    }
}

impl Drop for AffinityScope<'_> {
    fn drop(&mut self) {
        let Some(prior) = self.prior.take() else {
            return;
        };

        if let Err(error) = self.platform.restore_current_thread_affinity(&prior) {
            // Nothing actionable remains at this point; the thread is about to exit
            // anyway, taking its affinity with it.
            tracing::warn!("failed to restore thread affinity: {error}");
        }
    }
}
