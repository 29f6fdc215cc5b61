//! Bit-exact layouts of the thermal model-specific registers (MSRs) read by the
//! `core_temps` sampling engine.
//!
//! This package performs pure bit-layout interpretation: it turns raw 64-bit register
//! values into named fields and nothing else. There is no I/O and no concurrency here,
//! which keeps the layouts trivially testable in isolation.
//!
//! Three registers are covered, each addressed by a fixed numeric index:
//!
//! * [`MSR_TEMPERATURE_TARGET`] (`0x1A2`) — carries the TjMax temperature target,
//!   decoded via [`TemperatureTarget`].
//! * [`IA32_THERM_STATUS`] (`0x19C`) — carries the digital thermal sensor readout and
//!   the thermal event flags, decoded via [`ThermStatus`].
//! * [`MSR_AUX_808`] (`0x808`) — vendor-specific; its value is opaque and is only
//!   echoed verbatim in reports, so no decoded view exists for it.
//!
//! The field positions are fixed by the hardware specification and are reproduced
//! exactly. Reserved bit ranges carry no semantics and are not exposed.
//!
//! # Example
//!
//! ```
//! use thermal_msr::{TemperatureTarget, ThermStatus};
//!
//! // TjMax of 100°C, a DTS delta of 40 below it and a valid reading flag.
//! let target = TemperatureTarget::new(100 << 16);
//! let status = ThermStatus::new((1 << 31) | (40 << 16));
//!
//! assert!(status.reading_valid());
//! assert_eq!(
//!     i32::from(target.target()) - i32::from(status.dts()),
//!     60
//! );
//! ```

mod temperature_target;
mod therm_status;

pub use temperature_target::*;
pub use therm_status::*;

/// Address of the temperature-target register.
pub const MSR_TEMPERATURE_TARGET: u32 = 0x1A2;

/// Address of the thermal-status register.
pub const IA32_THERM_STATUS: u32 = 0x19C;

/// Address of the vendor-specific auxiliary register whose value is echoed in reports.
pub const MSR_AUX_808: u32 = 0x808;

/// Extracts an unsigned field of `width` bits starting at `low_bit` (0 = LSB).
pub(crate) const fn field(raw: u64, low_bit: u32, width: u32) -> u64 {
    (raw >> low_bit) & (u64::MAX >> (u64::BITS - width))
}

/// Extracts a single bit at `position` (0 = LSB).
pub(crate) const fn flag(raw: u64, position: u32) -> bool {
    (raw >> position) & 1 != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_extracts_exact_range() {
        // 0xAB in bits 16-23, garbage everywhere else.
        let raw = 0xFFFF_FFFF_00AB_FFFF_u64;
        assert_eq!(field(raw, 16, 8), 0xAB);
    }

    #[test]
    fn flag_reads_single_bit() {
        assert!(flag(1 << 31, 31));
        assert!(!flag(!(1_u64 << 31), 31));
    }
}
