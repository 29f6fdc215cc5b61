//! Platform Abstraction Layer (PAL). All operating system access of the sampling
//! engine goes through this layer, enabling it to be mocked in tests.

mod abstractions;
pub(crate) use abstractions::*;

mod facade;
pub(crate) use facade::*;

#[cfg(all(target_os = "linux", not(miri)))]
mod linux;
#[cfg(all(target_os = "linux", not(miri)))]
pub(crate) use linux::*;

// The fallback platform is the primary implementation on operating systems where the
// MSR device and affinity syscalls are unavailable, and under Miri.
#[cfg(any(miri, not(target_os = "linux")))]
mod fallback;
#[cfg(any(miri, not(target_os = "linux")))]
pub(crate) use fallback::*;
