use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// The well-known path workers attempt to deliver their report lines to.
///
/// The kernel log device is used so the per-core lines land next to the rest of the
/// host's diagnostic output.
pub(crate) const WELL_KNOWN_SINK_PATH: &str = "/dev/kmsg";

/// Best-effort consumer of formatted report lines.
///
/// The sink is advisory only: if the path does not exist, cannot be opened for writing
/// or the write fails, the report is silently dropped. Sink failures never affect the
/// outcome of the worker that emitted the report.
#[derive(Clone, Debug)]
pub(crate) struct ReportSink {
    path: PathBuf,
}

impl ReportSink {
    /// The sink at the well-known path.
    pub(crate) fn well_known() -> Self {
        Self::at_path(WELL_KNOWN_SINK_PATH)
    }

    /// A sink at an arbitrary path.
    pub(crate) fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the sink, writes the report bytes and closes it again. Failures are
    /// swallowed.
    pub(crate) fn emit(&self, report: &str) {
        let Ok(mut sink) = OpenOptions::new().append(true).open(&self.path) else {
            return;
        };

        drop(sink.write_all(report.as_bytes()));
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn writes_report_to_existing_file() {
        let file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        let sink = ReportSink::at_path(file.path());

        sink.emit("Core(00): Temp=60°C, MSR808=0x0000000000000000\n");
        sink.emit("Core(01): Temp=59°C, MSR808=0x0000000000000000\n");

        let contents = fs::read_to_string(file.path()).expect("failed to read sink file");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("Core(00): "));
    }

    #[test]
    fn missing_path_is_ignored() {
        let directory = tempfile::tempdir().expect("failed to create temp dir");
        let sink = ReportSink::at_path(directory.path().join("does-not-exist"));

        // Opening fails because we never create the file; emit must still return
        // without any observable effect.
        sink.emit("Core(00): Temperature reading invalid, MSR808=0x0000000000000000\n");

        assert!(!directory.path().join("does-not-exist").exists());
    }
}
