use std::fmt::Debug;
use std::io;
#[cfg(test)]
use std::sync::Arc;

use nonempty::NonEmpty;

use crate::ProcessorId;
#[cfg(test)]
use crate::pal::MockPlatform;
use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform};

/// Static-dispatch wrapper around the platform implementations: the real operating
/// system in production, a mock in tests.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Target(&'static BuildTargetPlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) fn target() -> Self {
        Self::Target(&BUILD_TARGET_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Platform for PlatformFacade {
    fn active_processor_count(&self) -> usize {
        match self {
            Self::Target(platform) => platform.active_processor_count(),
            #[cfg(test)]
            Self::Mock(platform) => platform.active_processor_count(),
        }
    }

    fn constrain_current_thread_to(
        &self,
        processor: ProcessorId,
    ) -> io::Result<NonEmpty<ProcessorId>> {
        match self {
            Self::Target(platform) => platform.constrain_current_thread_to(processor),
            #[cfg(test)]
            Self::Mock(platform) => platform.constrain_current_thread_to(processor),
        }
    }

    fn restore_current_thread_affinity(
        &self,
        processors: &NonEmpty<ProcessorId>,
    ) -> io::Result<()> {
        match self {
            Self::Target(platform) => platform.restore_current_thread_affinity(processors),
            #[cfg(test)]
            Self::Mock(platform) => platform.restore_current_thread_affinity(processors),
        }
    }

    fn read_msr(&self, processor: ProcessorId, register: u32) -> io::Result<u64> {
        match self {
            Self::Target(platform) => platform.read_msr(processor, register),
            #[cfg(test)]
            Self::Mock(platform) => platform.read_msr(processor, register),
        }
    }

    fn processor_brand(&self) -> Option<String> {
        match self {
            Self::Target(platform) => platform.processor_brand(),
            #[cfg(test)]
            Self::Mock(platform) => platform.processor_brand(),
        }
    }
}

impl From<&'static BuildTargetPlatform> for PlatformFacade {
    fn from(platform: &'static BuildTargetPlatform) -> Self {
        Self::Target(platform)
    }
}

#[cfg(test)]
impl From<MockPlatform> for PlatformFacade {
    fn from(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
