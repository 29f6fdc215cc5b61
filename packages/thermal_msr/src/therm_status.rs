use crate::{field, flag};

/// Decoded view over a raw `IA32_THERM_STATUS` value.
///
/// The low 12 bits are thermal event flags, in pairs of a live status bit and a sticky
/// log bit. Bits 16-23 carry the digital thermal sensor (DTS) readout as a delta below
/// the temperature target, bits 27-31 carry the sensor resolution and bit 31 indicates
/// whether the DTS readout is valid at all.
///
/// Note that validity of the *reading* is governed by [`reading_valid()`][Self::reading_valid];
/// decoding itself is arithmetic only and cannot fail.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ThermStatus {
    raw: u64,
}

impl ThermStatus {
    /// Wraps a raw register value.
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

    /// Thermal status flag, bit 0.
    #[inline]
    #[must_use]
    pub const fn status(self) -> bool {
        flag(self.raw, 0)
    }

    /// Sticky log of the thermal status flag, bit 1.
    #[inline]
    #[must_use]
    pub const fn status_log(self) -> bool {
        flag(self.raw, 1)
    }

    /// PROCHOT# assertion flag, bit 2.
    #[inline]
    #[must_use]
    pub const fn prochot(self) -> bool {
        flag(self.raw, 2)
    }

    /// Sticky log of PROCHOT# assertion, bit 3.
    #[inline]
    #[must_use]
    pub const fn prochot_log(self) -> bool {
        flag(self.raw, 3)
    }

    /// Critical temperature flag, bit 4.
    #[inline]
    #[must_use]
    pub const fn critical_temp(self) -> bool {
        flag(self.raw, 4)
    }

    /// Sticky log of the critical temperature flag, bit 5.
    #[inline]
    #[must_use]
    pub const fn critical_temp_log(self) -> bool {
        flag(self.raw, 5)
    }

    /// Thermal threshold #1 flag, bit 6.
    #[inline]
    #[must_use]
    pub const fn threshold1(self) -> bool {
        flag(self.raw, 6)
    }

    /// Sticky log of thermal threshold #1, bit 7.
    #[inline]
    #[must_use]
    pub const fn threshold1_log(self) -> bool {
        flag(self.raw, 7)
    }

    /// Thermal threshold #2 flag, bit 8.
    #[inline]
    #[must_use]
    pub const fn threshold2(self) -> bool {
        flag(self.raw, 8)
    }

    /// Sticky log of thermal threshold #2, bit 9.
    #[inline]
    #[must_use]
    pub const fn threshold2_log(self) -> bool {
        flag(self.raw, 9)
    }

    /// Power limitation flag, bit 10.
    #[inline]
    #[must_use]
    pub const fn power_limit(self) -> bool {
        flag(self.raw, 10)
    }

    /// Sticky log of the power limitation flag, bit 11.
    #[inline]
    #[must_use]
    pub const fn power_limit_log(self) -> bool {
        flag(self.raw, 11)
    }

    /// Digital thermal sensor readout, bits 16-23.
    ///
    /// Expressed as the offset in degrees Celsius below the temperature target at which
    /// the processor currently operates.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "field() masks the value to 8 bits"
    )]
    pub const fn dts(self) -> u8 {
        field(self.raw, 16, 8) as u8
    }

    /// Resolution of the digital thermal sensor in degrees Celsius, 5-bit field at bits 27-31.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "field() masks the value to 5 bits"
    )]
    pub const fn resolution(self) -> u8 {
        field(self.raw, 27, 5) as u8
    }

    /// Whether the digital thermal sensor readout is valid, bit 31.
    #[inline]
    #[must_use]
    pub const fn reading_valid(self) -> bool {
        flag(self.raw, 31)
    }
}

impl From<u64> for ThermStatus {
    #[inline]
    fn from(raw: u64) -> Self {
        Self::new(raw)
    }
}
