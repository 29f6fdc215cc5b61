use std::os::unix::fs::FileExt;
use std::{fs, io, mem};

use libc::cpu_set_t;
use nonempty::NonEmpty;

use crate::ProcessorId;
use crate::pal::Platform;

/// The platform implementation for the real operating system that the build is
/// targeting.
///
/// You would only use a different platform in unit tests that need a mock. Even then,
/// whenever possible, tests should use the real platform for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetPlatform;

/// Singleton instance of `BuildTargetPlatform`, used by public API entry points to
/// hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    fn active_processor_count(&self) -> usize {
        // This is a cpulist format file ("0,1,2-4,5-10:2" style list) covering every
        // online processor the host exposes.
        fs::read_to_string("/sys/devices/system/cpu/online")
            .ok()
            .and_then(|contents| cpulist::parse(contents.trim()).ok())
            .map_or(0, |processors| processors.len())
    }

    fn constrain_current_thread_to(
        &self,
        processor: ProcessorId,
    ) -> io::Result<NonEmpty<ProcessorId>> {
        let prior = current_thread_affinity()?;

        // SAFETY: All zeroes is a valid cpu_set_t.
        let mut cpuset: cpu_set_t = unsafe { mem::zeroed() };
        // SAFETY: No safety requirements beyond passing a valid set.
        unsafe { libc::CPU_SET(processor as usize, &mut cpuset) };

        set_current_thread_affinity(&cpuset)?;

        Ok(prior)
    }

    fn restore_current_thread_affinity(
        &self,
        processors: &NonEmpty<ProcessorId>,
    ) -> io::Result<()> {
        // SAFETY: All zeroes is a valid cpu_set_t.
        let mut cpuset: cpu_set_t = unsafe { mem::zeroed() };

        for processor in processors {
            // SAFETY: No safety requirements beyond passing a valid set.
            unsafe { libc::CPU_SET(*processor as usize, &mut cpuset) };
        }

        set_current_thread_affinity(&cpuset)
    }

    fn read_msr(&self, processor: ProcessorId, register: u32) -> io::Result<u64> {
        // The msr device returns EIO for a register the processor does not implement,
        // which is the user-mode surface of the fault RDMSR would raise.
        let device = fs::File::open(format!("/dev/cpu/{processor}/msr"))?;

        let mut value = [0_u8; 8];
        device.read_exact_at(&mut value, u64::from(register))?;

        Ok(u64::from_le_bytes(value))
    }

    fn processor_brand(&self) -> Option<String> {
        // This is a plaintext file with "key    : value" pairs, blocks separated by
        // empty lines. Every block carries the same model name, so the first one wins.
        let cpuinfo = fs::read_to_string("/proc/cpuinfo").ok()?;

        cpuinfo.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == "model name").then(|| value.trim().to_string())
        })
    }
}

fn set_current_thread_affinity(cpuset: &cpu_set_t) -> io::Result<()> {
    // 0 means current thread.
    // SAFETY: No safety requirements beyond passing valid arguments.
    let result = unsafe { libc::sched_setaffinity(0, size_of::<cpu_set_t>(), cpuset) };

    if result == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

fn current_thread_affinity() -> io::Result<NonEmpty<ProcessorId>> {
    // SAFETY: All zeroes is a valid cpu_set_t.
    let mut cpuset: cpu_set_t = unsafe { mem::zeroed() };

    // 0 means current thread.
    // SAFETY: No safety requirements beyond passing valid arguments.
    let result = unsafe { libc::sched_getaffinity(0, size_of::<cpu_set_t>(), &raw mut cpuset) };

    if result != 0 {
        return Err(io::Error::last_os_error());
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "CPU_SETSIZE is a small positive constant bounding the indexes"
    )]
    let allowed = (0..libc::CPU_SETSIZE as usize)
        .filter(|&index| {
            // SAFETY: The index is within the set's capacity.
            unsafe { libc::CPU_ISSET(index, &cpuset) }
        })
        .map(|index| index as ProcessorId)
        .collect();

    NonEmpty::from_vec(allowed)
        .ok_or_else(|| io::Error::other("calling thread has an empty affinity set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_at_least_one_processor() {
        // We are running on at least one processor, so enumeration of the real system
        // can never reasonably report zero.
        assert!(BUILD_TARGET_PLATFORM.active_processor_count() >= 1);
    }

    #[test]
    fn current_affinity_is_not_empty() {
        let affinity = current_thread_affinity().expect("affinity query failed");
        assert!(!affinity.is_empty());
    }

    #[test]
    fn constrain_and_restore_round_trip() {
        let prior = current_thread_affinity().expect("affinity query failed");
        let target = *prior.first();

        let captured = BUILD_TARGET_PLATFORM
            .constrain_current_thread_to(target)
            .expect("constraining to an allowed processor failed");

        assert_eq!(captured, prior);
        assert_eq!(current_thread_affinity().expect("affinity query failed").len(), 1);

        BUILD_TARGET_PLATFORM
            .restore_current_thread_affinity(&captured)
            .expect("restoring the prior affinity failed");

        assert_eq!(current_thread_affinity().expect("affinity query failed"), prior);
    }
}
