//! Exercises a full sampling pass against the real platform of the test host.
//!
//! Register reads may legitimately fault here (no `msr` kernel module, insufficient
//! privileges, non-Linux host); the properties below hold regardless.

use core_temps::{CoreOutcome, NO_READING, run_sampling_pass};

#[test]
fn pass_reports_every_processor_exactly_once() {
    let report = run_sampling_pass().expect("test host has at least one online processor");

    assert!(!report.is_empty());

    // Indexes are contiguous 0..N with no duplicates and no gaps.
    let indexes = report
        .cores()
        .iter()
        .map(|core| core.sample().index())
        .collect::<Vec<_>>();
    let expected = (0..u32::try_from(report.len()).unwrap()).collect::<Vec<_>>();
    assert_eq!(indexes, expected);

    for core in report.cores() {
        match core.outcome() {
            CoreOutcome::Sampled => {
                assert!(core.sample().therm_status().reading_valid());
            }
            CoreOutcome::InvalidReading | CoreOutcome::ReadFault => {
                assert_eq!(core.sample().temperature(), NO_READING);
            }
            CoreOutcome::SpawnFailed => {
                assert_eq!(core.sample().temperature(), 0);
            }
        }
    }
}

#[test]
fn repeated_passes_are_independent() {
    let first = run_sampling_pass().expect("pass failed");
    let second = run_sampling_pass().expect("pass failed");

    // The live count is queried per pass; on a stable host both see the same set.
    assert_eq!(first.len(), second.len());
}
