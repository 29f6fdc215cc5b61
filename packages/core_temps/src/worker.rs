use std::io;
use std::sync::Arc;

use rsevents::ManualResetEvent;
use thermal_msr::{IA32_THERM_STATUS, MSR_AUX_808, MSR_TEMPERATURE_TARGET};

use crate::ProcessorId;
use crate::affinity::AffinityScope;
use crate::pal::{Platform, PlatformFacade};
use crate::report::{CoreOutcome, CoreReport, CoreSample};
use crate::sink::ReportSink;

/// The raw register snapshots of one successful sampling region.
#[derive(Clone, Copy, Debug)]
struct RawReadings {
    tjmax: u64,
    therm_status: u64,
    aux: u64,
}

/// Samples one processor: pins to it, reads its registers under fault containment,
/// derives the temperature, emits the report and signals completion.
///
/// This is the entry point of each worker thread. It never panics on a register fault
/// and it signals `done` on every exit path, strictly before the thread exits, so the
/// coordinator's barrier can never deadlock on a worker that actually started.
pub(crate) fn sample_core(
    platform: &PlatformFacade,
    index: ProcessorId,
    sink: &ReportSink,
    done: Arc<ManualResetEvent>,
) -> CoreReport {
    // Dropping the guard sets the completion signal; tying it to a guard rather than a
    // plain call at the end makes the signal unconditional even on an unwind.
    let done = scopeguard::guard(done, |done| done.set());

    let report = match read_registers(platform, index) {
        Ok(readings) => CoreReport::sampled(CoreSample::new(
            index,
            readings.tjmax,
            readings.therm_status,
            readings.aux,
        )),
        Err(error) => {
            tracing::error!("Core({index:02}): error reading MSRs: {error}");
            CoreReport::faulted(index)
        }
    };

    if let Some(text) = report_text(&report) {
        sink.emit(&text);
        tracing::info!("{text}");
    }

    // Completion must be observable before this thread exits.
    drop(done);

    report
}

/// Reads the three thermal registers of the given processor, with the calling thread
/// constrained to that processor for the duration of the reads.
///
/// Any failing read aborts the remaining ones; the prior affinity scope is restored on
/// both paths.
fn read_registers(platform: &PlatformFacade, index: ProcessorId) -> io::Result<RawReadings> {
    // The registers are per-processor state: read from any other processor they yield
    // meaningless values, so the pinning is a correctness requirement, not a tuning.
    let _scope = AffinityScope::enter(platform, index)?;

    Ok(RawReadings {
        tjmax: platform.read_msr(index, MSR_TEMPERATURE_TARGET)?,
        therm_status: platform.read_msr(index, IA32_THERM_STATUS)?,
        aux: platform.read_msr(index, MSR_AUX_808)?,
    })
}

fn report_text(report: &CoreReport) -> Option<String> {
    match report.outcome() {
        CoreOutcome::Sampled | CoreOutcome::InvalidReading => {
            Some(report.sample().report_text())
        }
        // A faulted read already produced a diagnostic log entry and has nothing
        // meaningful to report; a slot without a worker never reaches this code.
        CoreOutcome::ReadFault | CoreOutcome::SpawnFailed => None,
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use nonempty::NonEmpty;
    use rsevents::{Awaitable, EventState};

    use super::*;
    use crate::pal::MockPlatform;
    use crate::report::{CoreOutcome, NO_READING};

    fn prior_affinity() -> NonEmpty<ProcessorId> {
        NonEmpty::from_vec(vec![0, 1, 2, 3]).expect("set is non-empty")
    }

    fn pinnable_platform() -> MockPlatform {
        let mut platform = MockPlatform::new();

        platform
            .expect_constrain_current_thread_to()
            .returning(|_| Ok(prior_affinity()));
        platform
            .expect_restore_current_thread_affinity()
            .times(1)
            .returning(|_| Ok(()));

        platform
    }

    fn discarding_sink() -> ReportSink {
        ReportSink::at_path("/nonexistent/report-sink")
    }

    #[test]
    fn valid_reading_derives_temperature() {
        let mut platform = pinnable_platform();

        platform
            .expect_read_msr()
            .with(eq(0), eq(MSR_TEMPERATURE_TARGET))
            .returning(|_, _| Ok(100 << 16));
        platform
            .expect_read_msr()
            .with(eq(0), eq(IA32_THERM_STATUS))
            .returning(|_, _| Ok((1 << 31) | (40 << 16)));
        platform
            .expect_read_msr()
            .with(eq(0), eq(MSR_AUX_808))
            .returning(|_, _| Ok(0xABCD));

        let done = Arc::new(ManualResetEvent::new(EventState::Unset));
        let report = sample_core(
            &PlatformFacade::from_mock(platform),
            0,
            &discarding_sink(),
            Arc::clone(&done),
        );

        assert_eq!(report.outcome(), CoreOutcome::Sampled);
        assert_eq!(report.sample().temperature(), 60);
        assert_eq!(report.sample().aux(), 0xABCD);
        done.wait();
    }

    #[test]
    fn invalid_reading_yields_sentinel() {
        let mut platform = pinnable_platform();

        // Reading-valid bit clear; everything else set to plausible values.
        platform
            .expect_read_msr()
            .returning(|_, register| match register {
                MSR_TEMPERATURE_TARGET => Ok(100 << 16),
                IA32_THERM_STATUS => Ok(40 << 16),
                _ => Ok(0),
            });

        let done = Arc::new(ManualResetEvent::new(EventState::Unset));
        let report = sample_core(
            &PlatformFacade::from_mock(platform),
            1,
            &discarding_sink(),
            Arc::clone(&done),
        );

        assert_eq!(report.outcome(), CoreOutcome::InvalidReading);
        assert_eq!(report.sample().temperature(), NO_READING);
        done.wait();
    }

    #[test]
    fn read_fault_is_contained_and_still_signals() {
        let mut platform = pinnable_platform();

        // The first read faults; the remaining reads must not be attempted.
        platform
            .expect_read_msr()
            .with(eq(2), eq(MSR_TEMPERATURE_TARGET))
            .times(1)
            .returning(|_, _| Err(io::Error::other("synthetic register fault")));

        let done = Arc::new(ManualResetEvent::new(EventState::Unset));
        let report = sample_core(
            &PlatformFacade::from_mock(platform),
            2,
            &discarding_sink(),
            Arc::clone(&done),
        );

        assert_eq!(report.outcome(), CoreOutcome::ReadFault);
        assert_eq!(report.sample().temperature(), NO_READING);
        done.wait();
    }

    #[test]
    fn affinity_is_restored_on_fault_path() {
        // pinnable_platform() already asserts restore is called exactly once; pair it
        // with a faulting read to cover the containment path specifically.
        let mut platform = pinnable_platform();

        platform
            .expect_read_msr()
            .returning(|_, _| Err(io::Error::from(io::ErrorKind::Unsupported)));

        let done = Arc::new(ManualResetEvent::new(EventState::Unset));
        drop(sample_core(
            &PlatformFacade::from_mock(platform),
            3,
            &discarding_sink(),
            done,
        ));
    }

    #[test]
    fn pin_failure_is_a_contained_fault() {
        let mut platform = MockPlatform::new();

        platform
            .expect_constrain_current_thread_to()
            .returning(|_| Err(io::Error::from(io::ErrorKind::PermissionDenied)));
        platform.expect_restore_current_thread_affinity().times(0);
        platform.expect_read_msr().times(0);

        let done = Arc::new(ManualResetEvent::new(EventState::Unset));
        let report = sample_core(
            &PlatformFacade::from_mock(platform),
            0,
            &discarding_sink(),
            Arc::clone(&done),
        );

        assert_eq!(report.outcome(), CoreOutcome::ReadFault);
        done.wait();
    }
}
