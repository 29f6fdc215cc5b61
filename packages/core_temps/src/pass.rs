use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rsevents::{Awaitable, EventState, ManualResetEvent};

use crate::ProcessorId;
use crate::error::{PassError, Result};
use crate::pal::{Platform, PlatformFacade};
use crate::report::{CoreReport, PassReport};
use crate::sink::ReportSink;
use crate::worker;

/// One sampling slot: the completion signal the coordinator's barrier waits on and the
/// ownership of the worker thread, if one was spawned.
///
/// The signal transitions from unset to set exactly once per slot: either the worker
/// sets it on its way out, or the coordinator sets it immediately when the spawn fails
/// and no worker will ever do so.
struct CoreSlot {
    index: ProcessorId,
    done: Arc<ManualResetEvent>,
    handle: Option<JoinHandle<CoreReport>>,
}

/// The seam through which worker threads are launched, so tests can inject spawn
/// failures for individual slots.
pub(crate) trait WorkerSpawner {
    fn spawn(
        &self,
        index: ProcessorId,
        worker: Box<dyn FnOnce() -> CoreReport + Send + 'static>,
    ) -> io::Result<JoinHandle<CoreReport>>;
}

/// Spawns real operating system threads, one per slot.
pub(crate) struct ThreadSpawner;

impl WorkerSpawner for ThreadSpawner {
    fn spawn(
        &self,
        index: ProcessorId,
        worker: Box<dyn FnOnce() -> CoreReport + Send + 'static>,
    ) -> io::Result<JoinHandle<CoreReport>> {
        thread::Builder::new()
            .name(format!("core-sampler-{index}"))
            .spawn(worker)
    }
}

/// Runs one sampling pass over every online logical processor and blocks until all of
/// them have reported.
///
/// Spawns one affinity-pinned worker thread per processor, waits for every slot's
/// completion signal and returns the per-core results in index order. Per-core
/// failures (a faulted register read, a worker that could not be spawned) are recorded
/// in the returned [`PassReport`]; the pass itself only fails when it cannot even be
/// attempted.
///
/// Passes are not concurrent by design: each call fully drains before returning, and
/// nothing is shared between calls.
///
/// # Errors
///
/// Returns [`PassError::NoProcessorsFound`] if processor enumeration yields zero
/// processors and [`PassError::AllocationFailure`] if the per-processor slot storage
/// cannot be allocated. Both occur before any worker is spawned.
pub fn run_sampling_pass() -> std::result::Result<PassReport, PassError> {
    run_pass(
        &PlatformFacade::target(),
        &ReportSink::well_known(),
        &ThreadSpawner,
    )
}

pub(crate) fn run_pass(
    platform: &PlatformFacade,
    sink: &ReportSink,
    spawner: &dyn WorkerSpawner,
) -> Result<PassReport> {
    // The live count is queried exactly once; the pass does not react to processors
    // coming or going while it is in flight.
    let processor_count = platform.active_processor_count();
    if processor_count == 0 {
        return Err(PassError::NoProcessorsFound);
    }

    if let Some(brand) = platform.processor_brand() {
        tracing::info!("CPU brand: {brand}");
    }

    let mut slots: Vec<CoreSlot> = Vec::new();
    slots
        .try_reserve_exact(processor_count)
        .map_err(|source| PassError::AllocationFailure {
            processor_count,
            source,
        })?;

    #[expect(
        clippy::cast_possible_truncation,
        reason = "unrealistic to have more than u32::MAX processors"
    )]
    for index in (0..processor_count).map(|index| index as ProcessorId) {
        let done = Arc::new(ManualResetEvent::new(EventState::Unset));

        let entrypoint = {
            let platform = platform.clone();
            let sink = sink.clone();
            let done = Arc::clone(&done);

            Box::new(move || worker::sample_core(&platform, index, &sink, done))
        };

        let handle = match spawner.spawn(index, entrypoint) {
            Ok(handle) => Some(handle),
            Err(error) => {
                tracing::error!("failed to spawn sampling thread for core {index}: {error}");

                // No worker will ever signal this slot, so the coordinator must,
                // otherwise the barrier below would never drain.
                done.set();
                None
            }
        };

        slots.push(CoreSlot {
            index,
            done,
            handle,
        });
    }

    // Full barrier, in index order: the pass is not finished until every slot has
    // signaled, regardless of how many spawns failed or workers faulted. The wait is
    // deliberately unbounded; every modeled failure path still signals.
    for slot in &slots {
        slot.done.wait();
    }

    let mut cores = Vec::with_capacity(slots.len());
    for slot in slots {
        let report = match slot.handle {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                // The signal was still set by the worker's guard on the way out; only
                // the result value is lost.
                tracing::error!("sampling thread for core {} panicked", slot.index);
                CoreReport::faulted(slot.index)
            }),
            None => CoreReport::unsampled(slot.index),
        };

        cores.push(report);
    }

    tracing::info!("all core temperature readings completed");

    Ok(PassReport::new(cores))
}
