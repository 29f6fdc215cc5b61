//! One-shot per-core thermal telemetry for many-processor systems.
//!
//! A single call to [`run_sampling_pass()`] enumerates every logical processor that is
//! online, spawns one worker thread pinned to each of them, reads a small fixed set of
//! thermal model-specific registers (MSRs) on each processor, derives a per-core
//! temperature and reports the results. The pass blocks until every processor has
//! reported exactly once.
//!
//! The registers being read are per-processor hardware state: reading them from the
//! wrong processor yields meaningless values. Affinity pinning is therefore not an
//! optimization here but a correctness requirement, which is why each worker is a real
//! thread constrained to exactly one processor for the duration of its reads.
//!
//! # What a pass does
//!
//! 1. Queries the live logical processor count, once. Zero processors fails the pass.
//! 2. Allocates one sampling slot per processor, indexed `0..N`.
//! 3. Spawns one pinned worker per slot. A worker that cannot be spawned is compensated
//!    for by the coordinator, so the pass still completes.
//! 4. Each worker reads the temperature-target, thermal-status and auxiliary registers
//!    under fault containment, computes `temperature = target - dts` when the sensor
//!    reports a valid reading, emits a formatted report line and signals completion.
//! 5. The coordinator waits for every slot's completion signal, joins every worker and
//!    returns the per-core results.
//!
//! Per-core failures (an unreadable register, a thread that could not be spawned) never
//! fail the pass as a whole; they are recorded in the returned [`PassReport`]. The pass
//! itself only fails when it cannot even be attempted, see [`PassError`].
//!
//! # Example
//!
//! ```no_run
//! let report = core_temps::run_sampling_pass()?;
//!
//! for core in report.cores() {
//!     println!("core {}: {}°C", core.sample().index(), core.sample().temperature());
//! }
//! # Ok::<(), core_temps::PassError>(())
//! ```
//!
//! # Operating system compatibility
//!
//! The real register reads require Linux with the `msr` kernel module loaded
//! (`/dev/cpu/*/msr`) and sufficient privileges. On other operating systems a fallback
//! platform is provided that enumerates processors and degrades every register read
//! into a contained fault, so a pass still completes with `-1` temperatures.

mod error;
mod pass;
mod primitive_types;
mod report;
mod sink;

mod affinity;
mod worker;

pub use error::*;
pub use pass::run_sampling_pass;
pub use primitive_types::*;
pub use report::*;

pub(crate) mod pal;
