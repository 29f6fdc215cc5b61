use crate::field;

/// Decoded view over a raw `MSR_TEMPERATURE_TARGET` value.
///
/// The only architecturally meaningful field is the temperature target (TjMax), the
/// maximum rated junction temperature in degrees Celsius. Per-core temperatures are
/// derived by subtracting the digital thermal sensor delta from this value.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TemperatureTarget {
    raw: u64,
}

impl TemperatureTarget {
    /// Wraps a raw register value. Decoding is arithmetic only and cannot fail.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self { raw }
    }

    /// The raw 64-bit register snapshot, as read from the hardware.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.raw
    }

    /// The temperature target (TjMax) in degrees Celsius, bits 16-23.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "field() masks the value to 8 bits"
    )]
    pub const fn target(self) -> u8 {
        field(self.raw, 16, 8) as u8
    }
}

impl From<u64> for TemperatureTarget {
    #[inline]
    fn from(raw: u64) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_occupies_bits_16_to_23() {
        let value = TemperatureTarget::new(100 << 16);
        assert_eq!(value.target(), 100);

        // Neighboring bits do not bleed into the field.
        let value = TemperatureTarget::new((1 << 15) | (1 << 24));
        assert_eq!(value.target(), 0);
    }

    #[test]
    fn reserved_bits_are_ignored() {
        let value = TemperatureTarget::new(u64::MAX);
        assert_eq!(value.target(), 0xFF);

        let value = TemperatureTarget::new(!(0xFF_u64 << 16));
        assert_eq!(value.target(), 0);
    }

    #[test]
    fn raw_round_trips() {
        let value = TemperatureTarget::new(0x1234_5678_9ABC_DEF0);
        assert_eq!(value.raw(), 0x1234_5678_9ABC_DEF0);
    }

    #[test]
    fn default_is_all_zeroes() {
        assert_eq!(TemperatureTarget::default().raw(), 0);
        assert_eq!(TemperatureTarget::default().target(), 0);
    }
}
