//! Register map of the IS31FL3235A.
//!
//! Addresses, bit layouts and value encodings, plus the helpers used by the
//! driver to assemble control bytes. Everything here is constant data; there
//! are no error conditions.

/// Number of output channels.
pub const NUM_CHANNELS: usize = 28;

/// Software shutdown control register.
pub const REG_SHUTDOWN: u8 = 0x00;
/// First PWM register (OUT1); OUT28 is at 0x20.
pub const REG_PWM_BASE: u8 = 0x05;
/// Update register; writing [`UPDATE_TRIGGER`] loads all staged PWM and
/// control values into the active registers at once.
pub const REG_UPDATE: u8 = 0x25;
/// First LED control register (OUT1); OUT28 is at 0x45.
pub const REG_CTRL_BASE: u8 = 0x2A;
/// PWM frequency select register.
pub const REG_FREQUENCY: u8 = 0x4B;
/// Reset register; writing [`RESET_TRIGGER`] restores power-on defaults.
pub const REG_RESET: u8 = 0x4F;

/// Shutdown register value entering software shutdown.
pub const SHUTDOWN_MODE: u8 = 0x00;
/// Shutdown register value for normal operation.
pub const SHUTDOWN_NORMAL: u8 = 0x01;
/// Value written to [`REG_UPDATE`] to commit staged registers.
pub const UPDATE_TRIGGER: u8 = 0x00;
/// Value written to [`REG_RESET`] to reset the chip.
pub const RESET_TRIGGER: u8 = 0x00;

/// Output enable bit (D0) of a control register.
///
/// Polarity is a documented assumption pending validation against hardware:
/// a set bit is taken to mean the output follows its PWM register.
pub const CTRL_OUT_ENABLE: u8 = 0x01;
/// Shift of the current scale field (D2:D1) within a control register.
pub const CTRL_SCALE_SHIFT: u8 = 1;
/// Mask of the current scale field.
pub const CTRL_SCALE_MASK: u8 = 0x06;
/// Bits D7:D3 of a control register are reserved and stay zero.
pub const CTRL_RESERVED_MASK: u8 = 0xF8;

/// 7-bit I2C address with the AD pin strapped to GND.
pub const ADDR_AD_GND: u8 = 0x3C;
/// 7-bit I2C address with the AD pin strapped to VCC.
pub const ADDR_AD_VCC: u8 = 0x3D;
/// 7-bit I2C address with the AD pin strapped to SCL.
pub const ADDR_AD_SCL: u8 = 0x3E;
/// 7-bit I2C address with the AD pin strapped to SDA.
pub const ADDR_AD_SDA: u8 = 0x3F;

/// Settle time after a reset, in milliseconds.
pub const RESET_DELAY_MS: u32 = 1;
/// Settle time after releasing hardware shutdown, in milliseconds.
pub const STARTUP_DELAY_MS: u32 = 1;

/// Returns the PWM register address for a channel.
///
/// Channels map linearly onto consecutive registers, which is what allows
/// burst writes over channel ranges.
///
/// ```
/// use is31fl3235a::registers::pwm_register;
///
/// assert_eq!(pwm_register(0), 0x05);
/// assert_eq!(pwm_register(27), 0x20);
/// ```
pub const fn pwm_register(channel: u8) -> u8 {
    REG_PWM_BASE + channel
}

/// Returns the LED control register address for a channel.
///
/// ```
/// use is31fl3235a::registers::control_register;
///
/// assert_eq!(control_register(0), 0x2A);
/// assert_eq!(control_register(27), 0x45);
/// ```
pub const fn control_register(channel: u8) -> u8 {
    REG_CTRL_BASE + channel
}

/// Per-channel output current scale, as a fraction of the IMAX set by the
/// external resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum CurrentScale {
    /// Full IMAX.
    Full = 0b00,
    /// IMAX / 2.
    Half = 0b01,
    /// IMAX / 3.
    Third = 0b10,
    /// IMAX / 4.
    Quarter = 0b11,
}

impl CurrentScale {
    /// Raw two-bit field value, unshifted.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => CurrentScale::Full,
            0b01 => CurrentScale::Half,
            0b10 => CurrentScale::Third,
            _ => CurrentScale::Quarter,
        }
    }
}

/// PWM output frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum PwmFrequency {
    ThreeKHz,
    TwentyTwoKHz,
}

impl PwmFrequency {
    pub const fn register_value(self) -> u8 {
        match self {
            PwmFrequency::ThreeKHz => 0x00,
            PwmFrequency::TwentyTwoKHz => 0x01,
        }
    }
}

/// Encodes a full control byte from its fields. Reserved bits stay zero.
pub const fn control_value(enable: bool, scale: CurrentScale) -> u8 {
    let enable = if enable { CTRL_OUT_ENABLE } else { 0 };
    enable | (scale.bits() << CTRL_SCALE_SHIFT)
}

/// Replaces the enable bit of a control byte, preserving the scale field.
pub const fn with_enable(control: u8, enable: bool) -> u8 {
    if enable {
        control | CTRL_OUT_ENABLE
    } else {
        control & !CTRL_OUT_ENABLE
    }
}

/// Replaces the scale field of a control byte, preserving the enable bit.
pub const fn with_scale(control: u8, scale: CurrentScale) -> u8 {
    (control & !CTRL_SCALE_MASK) | (scale.bits() << CTRL_SCALE_SHIFT)
}

/// Returns true if a control byte has its output enabled.
pub const fn is_enabled(control: u8) -> bool {
    control & CTRL_OUT_ENABLE != 0
}

/// Extracts the scale field of a control byte.
pub const fn scale_of(control: u8) -> CurrentScale {
    CurrentScale::from_bits((control & CTRL_SCALE_MASK) >> CTRL_SCALE_SHIFT)
}

/// Converts a 0-100 brightness percentage to the nearest 0-255 PWM duty.
///
/// Returns `None` above 100. This is the only place percentages exist; the
/// driver itself stores and writes raw duty values.
pub const fn pwm_from_percent(percent: u8) -> Option<u8> {
    if percent > 100 {
        return None;
    }
    Some(((percent as u16 * 255 + 50) / 100) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_registers_cover_the_documented_ranges() {
        assert_eq!(pwm_register(0), 0x05);
        assert_eq!(pwm_register(27), 0x20);
        assert_eq!(control_register(0), 0x2A);
        assert_eq!(control_register(27), 0x45);
    }

    #[test]
    fn control_encoding_scenarios() {
        // Enabled at full scale, the power-on configuration
        assert_eq!(control_value(true, CurrentScale::Full), 0x01);

        // Enabled at quarter scale
        assert_eq!(control_value(true, CurrentScale::Quarter), 0x07);

        // Disabled keeps the scale field
        assert_eq!(control_value(false, CurrentScale::Half), 0x02);

        // No encoding touches the reserved bits
        for enable in [false, true] {
            for scale in [
                CurrentScale::Full,
                CurrentScale::Half,
                CurrentScale::Third,
                CurrentScale::Quarter,
            ] {
                assert_eq!(control_value(enable, scale) & CTRL_RESERVED_MASK, 0);
            }
        }
    }

    #[test]
    fn field_updates_are_independent() {
        let byte = control_value(true, CurrentScale::Full);

        // Scale change keeps the enable bit
        let byte = with_scale(byte, CurrentScale::Quarter);
        assert_eq!(byte, 0x07);
        assert!(is_enabled(byte));

        // Enable change keeps the scale field
        let byte = with_enable(byte, false);
        assert_eq!(scale_of(byte), CurrentScale::Quarter);
        assert!(!is_enabled(byte));

        let byte = with_enable(byte, true);
        assert_eq!(byte, 0x07);
    }

    #[test]
    fn scale_round_trips_through_a_control_byte() {
        for scale in [
            CurrentScale::Full,
            CurrentScale::Half,
            CurrentScale::Third,
            CurrentScale::Quarter,
        ] {
            assert_eq!(scale_of(with_scale(0x01, scale)), scale);
        }
    }

    #[test]
    fn percent_conversion_endpoints() {
        assert_eq!(pwm_from_percent(0), Some(0));
        assert_eq!(pwm_from_percent(50), Some(128));
        assert_eq!(pwm_from_percent(100), Some(255));
        assert_eq!(pwm_from_percent(101), None);
        assert_eq!(pwm_from_percent(255), None);
    }
}
