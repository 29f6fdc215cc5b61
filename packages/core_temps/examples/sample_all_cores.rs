//! Runs one sampling pass over every online logical processor and prints the results.
//!
//! The real register reads require Linux with the `msr` kernel module loaded and
//! sufficient privileges; without them, every core reports a contained read fault.

use core_temps::{CoreOutcome, NO_READING};

fn main() {
    tracing_subscriber::fmt().init();

    let report = match core_temps::run_sampling_pass() {
        Ok(report) => report,
        Err(error) => {
            eprintln!("sampling pass could not be attempted: {error}");
            return;
        }
    };

    for core in report.cores() {
        let sample = core.sample();

        match core.outcome() {
            CoreOutcome::Sampled => {
                println!("core {:02}: {}°C", sample.index(), sample.temperature());
            }
            CoreOutcome::InvalidReading => {
                debug_assert_eq!(sample.temperature(), NO_READING);
                println!("core {:02}: no valid reading", sample.index());
            }
            CoreOutcome::ReadFault => {
                println!("core {:02}: register read faulted", sample.index());
            }
            CoreOutcome::SpawnFailed => {
                println!("core {:02}: sampling thread not spawned", sample.index());
            }
        }
    }
}
