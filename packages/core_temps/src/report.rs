use thermal_msr::{TemperatureTarget, ThermStatus};

use crate::ProcessorId;

/// Temperature value recorded when no valid reading was obtained, in place of a
/// Celsius value.
pub const NO_READING: i32 = -1;

/// One logical processor's register snapshots and the temperature derived from them.
///
/// Written only by the worker that owns the processor's slot (or defaulted by the
/// coordinator when no worker ran); read only after the pass barrier has drained.
#[derive(Clone, Copy, Debug)]
pub struct CoreSample {
    index: ProcessorId,
    temperature: i32,
    tjmax: TemperatureTarget,
    therm_status: ThermStatus,
    aux: u64,
}

impl CoreSample {
    /// Derives a sample from the three raw register snapshots.
    ///
    /// The temperature is `target - dts` when the sensor reports a valid reading. The
    /// subtraction is deliberately not clamped; a DTS delta exceeding the target yields
    /// a negative Celsius value, preserved as-is.
    #[must_use]
    pub(crate) fn new(index: ProcessorId, tjmax: u64, therm_status: u64, aux: u64) -> Self {
        let tjmax = TemperatureTarget::new(tjmax);
        let therm_status = ThermStatus::new(therm_status);

        let temperature = if therm_status.reading_valid() {
            i32::from(tjmax.target()) - i32::from(therm_status.dts())
        } else {
            NO_READING
        };

        Self {
            index,
            temperature,
            tjmax,
            therm_status,
            aux,
        }
    }

    /// The sample of a processor whose register reads faulted: zeroed snapshots and the
    /// [`NO_READING`] sentinel.
    #[must_use]
    pub(crate) fn faulted(index: ProcessorId) -> Self {
        Self {
            index,
            temperature: NO_READING,
            tjmax: TemperatureTarget::default(),
            therm_status: ThermStatus::default(),
            aux: 0,
        }
    }

    /// The zero-initialized sample of a processor whose worker never ran.
    #[must_use]
    pub(crate) fn unsampled(index: ProcessorId) -> Self {
        Self {
            index,
            temperature: 0,
            tjmax: TemperatureTarget::default(),
            therm_status: ThermStatus::default(),
            aux: 0,
        }
    }

    /// The slot index of the processor this sample belongs to.
    #[inline]
    #[must_use]
    pub fn index(&self) -> ProcessorId {
        self.index
    }

    /// The derived temperature in degrees Celsius, or [`NO_READING`] if no valid
    /// reading was obtained.
    #[inline]
    #[must_use]
    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    /// The temperature-target register snapshot.
    #[inline]
    #[must_use]
    pub fn tjmax(&self) -> TemperatureTarget {
        self.tjmax
    }

    /// The thermal-status register snapshot.
    #[inline]
    #[must_use]
    pub fn therm_status(&self) -> ThermStatus {
        self.therm_status
    }

    /// The raw auxiliary register snapshot. Opaque; only echoed in reports.
    #[inline]
    #[must_use]
    pub fn aux(&self) -> u64 {
        self.aux
    }

    /// Renders the newline-terminated report text for this sample.
    ///
    /// A sample with a valid temperature produces the full multi-line form including
    /// the individual thermal-status fields; one without produces the single
    /// invalid-reading line.
    #[must_use]
    pub fn report_text(&self) -> String {
        if self.temperature >= 0 {
            let status = self.therm_status;
            format!(
                "Core({:02}): Temp={}°C, MSR808=0x{:016X}\n\
                 \x20 ThermStatus: StatusBit={}, PROCHOT={}, CriticalTemp={}, \
                 Threshold1={}, Threshold2={}, PowerLimit={}\n\
                 \x20 DTS={}, Resolution={}, ReadingValid={}\n",
                self.index,
                self.temperature,
                self.aux,
                u8::from(status.status()),
                u8::from(status.prochot()),
                u8::from(status.critical_temp()),
                u8::from(status.threshold1()),
                u8::from(status.threshold2()),
                u8::from(status.power_limit()),
                status.dts(),
                status.resolution(),
                u8::from(status.reading_valid()),
            )
        } else {
            format!(
                "Core({:02}): Temperature reading invalid, MSR808=0x{:016X}\n",
                self.index, self.aux,
            )
        }
    }
}

/// How a processor's slot concluded during a sampling pass.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "the pass has a fixed set of per-slot conclusions"
)]
pub enum CoreOutcome {
    /// The registers were read and the sensor reported a valid reading.
    Sampled,

    /// The registers were read but the sensor reported no valid reading. This is a data
    /// condition, not an error.
    InvalidReading,

    /// A register read faulted; the fault was contained inside the worker.
    ReadFault,

    /// The worker thread could not be spawned; the coordinator signaled the slot on the
    /// worker's behalf.
    SpawnFailed,
}

/// The record of one sampling slot: the sample and how it came to be.
#[derive(Clone, Copy, Debug)]
pub struct CoreReport {
    sample: CoreSample,
    outcome: CoreOutcome,
}

impl CoreReport {
    /// The record of a worker that read its registers successfully.
    #[must_use]
    pub(crate) fn sampled(sample: CoreSample) -> Self {
        let outcome = if sample.therm_status().reading_valid() {
            CoreOutcome::Sampled
        } else {
            CoreOutcome::InvalidReading
        };

        Self { sample, outcome }
    }

    /// The record of a worker whose register reads faulted.
    #[must_use]
    pub(crate) fn faulted(index: ProcessorId) -> Self {
        Self {
            sample: CoreSample::faulted(index),
            outcome: CoreOutcome::ReadFault,
        }
    }

    /// The record of a slot whose worker never ran.
    #[must_use]
    pub(crate) fn unsampled(index: ProcessorId) -> Self {
        Self {
            sample: CoreSample::unsampled(index),
            outcome: CoreOutcome::SpawnFailed,
        }
    }

    /// The processor's register snapshots and derived temperature.
    #[inline]
    #[must_use]
    pub fn sample(&self) -> &CoreSample {
        &self.sample
    }

    /// How this slot concluded.
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> CoreOutcome {
        self.outcome
    }
}

/// The results of one completed sampling pass: one [`CoreReport`] per logical
/// processor, in slot index order.
#[derive(Clone, Debug)]
pub struct PassReport {
    cores: Vec<CoreReport>,
}

impl PassReport {
    #[must_use]
    pub(crate) fn new(cores: Vec<CoreReport>) -> Self {
        Self { cores }
    }

    /// The per-processor records, in slot index order.
    #[inline]
    #[must_use]
    pub fn cores(&self) -> &[CoreReport] {
        &self.cores
    }

    /// The number of processors the pass attempted.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cores.len()
    }

    /// Whether the pass attempted zero processors. Never true for a pass that
    /// completed, since an empty processor set fails the pass instead.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }
}
