//! Driver for a single IS31FL3235A device instance.
//!
//! All mutation operations follow the same discipline: validate before any
//! bus access, write the staging register(s), then update the in-memory
//! mirror to match. The chip double-buffers PWM and control registers, so
//! nothing becomes visible on the outputs until [`Is31fl3235a::update`]
//! writes the trigger register. The auto-committing entry points do this as
//! their final step; the `_no_update` variants leave the change staged.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use heapless::Vec;

use crate::cache::ChannelCache;
use crate::error::Error;
use crate::registers::{
    CurrentScale, NUM_CHANNELS, PwmFrequency, RESET_DELAY_MS, REG_FREQUENCY, REG_RESET,
    REG_SHUTDOWN, REG_UPDATE, RESET_TRIGGER, SHUTDOWN_MODE, SHUTDOWN_NORMAL, STARTUP_DELAY_MS,
    UPDATE_TRIGGER, control_register, control_value, is_enabled, pwm_from_percent, pwm_register,
    scale_of, with_enable, with_scale,
};

/// Wire frame capacity: one register address plus a value per channel.
const FRAME_CAPACITY: usize = NUM_CHANNELS + 1;

/// Placeholder SDB pin for devices wired without one.
///
/// Used as the pin type parameter by [`Is31fl3235a::new`]; every pin
/// operation is a successful no-op, and hardware shutdown reports
/// [`Error::NotSupported`] before touching it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSdb;

impl embedded_hal::digital::ErrorType for NoSdb {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoSdb {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Decoded view of one channel's cached register state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ChannelState {
    /// Last PWM duty written (0 = off, 255 = full).
    pub pwm: u8,
    /// Output enable bit of the control register.
    pub enabled: bool,
    /// Current scale field of the control register.
    pub scale: CurrentScale,
}

/// Driver for one IS31FL3235A on an I2C bus.
///
/// Owns the bus handle, the optional SDB (hardware shutdown) line, a delay
/// provider and the register mirror. Two instances on the same or different
/// buses are fully independent.
pub struct Is31fl3235a<I2C, SDB, D> {
    i2c: I2C,
    address: u8,
    sdb: Option<SDB>,
    delay: D,
    cache: ChannelCache,
}

impl<I2C, D> Is31fl3235a<I2C, NoSdb, D> {
    /// Creates a driver for a device wired without an SDB line.
    ///
    /// The device is not usable until [`initialize`](Self::initialize)
    /// succeeds.
    pub fn new(i2c: I2C, address: u8, delay: D) -> Self {
        Self {
            i2c,
            address,
            sdb: None,
            delay,
            cache: ChannelCache::new(),
        }
    }
}

impl<I2C, SDB, D> Is31fl3235a<I2C, SDB, D> {
    /// Creates a driver for a device whose SDB pin is under our control.
    pub fn new_with_sdb(i2c: I2C, address: u8, sdb: SDB, delay: D) -> Self {
        Self {
            i2c,
            address,
            sdb: Some(sdb),
            delay,
            cache: ChannelCache::new(),
        }
    }

    /// Releases the underlying bus and pin resources.
    pub fn release(self) -> (I2C, Option<SDB>) {
        (self.i2c, self.sdb)
    }

    /// True once [`initialize`](Self::initialize) has completed.
    pub fn is_initialized(&self) -> bool {
        self.cache.initialized()
    }

    /// True while the chip is commanded into software shutdown.
    pub fn is_software_shutdown(&self) -> bool {
        self.cache.software_shutdown()
    }

    /// True while the SDB line is driven to its shutdown level.
    pub fn is_hardware_shutdown(&self) -> bool {
        self.cache.hardware_shutdown()
    }
}

impl<I2C, SDB, D> Is31fl3235a<I2C, SDB, D>
where
    I2C: I2c,
    SDB: OutputPin,
    D: DelayNs,
{
    /// Brings the chip to a known state and marks the driver ready.
    ///
    /// Releases hardware shutdown (if an SDB line is configured), resets all
    /// registers, leaves software shutdown, selects the PWM frequency, then
    /// stages every channel to zero duty and enabled-at-full-scale and
    /// commits once. Until this succeeds, every other operation fails with
    /// [`Error::NotReady`].
    ///
    /// May be called again to re-run the power-on sequence, e.g. after the
    /// chip lost power; the mirror is rebuilt from scratch.
    pub fn initialize(
        &mut self,
        frequency: PwmFrequency,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.cache = ChannelCache::new();

        if let Some(sdb) = self.sdb.as_mut() {
            sdb.set_high().map_err(Error::Pin)?;
            self.delay.delay_ms(STARTUP_DELAY_MS);
        }

        self.write_register(REG_RESET, RESET_TRIGGER)?;
        self.delay.delay_ms(RESET_DELAY_MS);

        self.write_register(REG_SHUTDOWN, SHUTDOWN_NORMAL)?;
        self.write_register(REG_FREQUENCY, frequency.register_value())?;

        let pwm = [0; NUM_CHANNELS];
        self.write_burst(pwm_register(0), &pwm)?;
        self.cache.copy_pwm_range(0, &pwm);

        let control = [control_value(true, CurrentScale::Full); NUM_CHANNELS];
        self.write_burst(control_register(0), &control)?;
        self.cache.copy_control_range(0, &control);

        self.trigger_update()?;
        self.cache.set_initialized();
        Ok(())
    }

    /// Sets one channel's PWM duty and commits.
    pub fn set_brightness(
        &mut self,
        channel: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_pwm(channel, value, true)
    }

    /// Sets one channel's PWM duty, leaving it staged until the next commit.
    pub fn set_brightness_no_update(
        &mut self,
        channel: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_pwm(channel, value, false)
    }

    /// Sets one channel's duty from a 0-100 percentage and commits.
    ///
    /// A stateless convenience over [`set_brightness`](Self::set_brightness);
    /// the mirror only ever holds raw duty values.
    pub fn set_brightness_percent(
        &mut self,
        channel: u8,
        percent: u8,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        let value = pwm_from_percent(percent).ok_or(Error::InvalidArgument)?;
        self.write_pwm(channel, value, true)
    }

    /// Writes PWM duties to consecutive channels in one burst and commits.
    ///
    /// The burst plus the single trigger write is what makes all channels in
    /// the range change appearance simultaneously; there is no point at
    /// which a subset of them is visible.
    pub fn write_channels(
        &mut self,
        start: u8,
        values: &[u8],
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_pwm_range(start, values, true)
    }

    /// Writes PWM duties to consecutive channels in one burst, staged only.
    pub fn write_channels_no_update(
        &mut self,
        start: u8,
        values: &[u8],
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_pwm_range(start, values, false)
    }

    /// Sets one channel's current scale, preserving its enable bit, and
    /// commits.
    pub fn set_current_scale(
        &mut self,
        channel: u8,
        scale: CurrentScale,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_scale(channel, scale, true)
    }

    /// Sets one channel's current scale, staged only.
    pub fn set_current_scale_no_update(
        &mut self,
        channel: u8,
        scale: CurrentScale,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_scale(channel, scale, false)
    }

    /// Enables or disables one channel, preserving its scale field, and
    /// commits.
    pub fn set_channel_enable(
        &mut self,
        channel: u8,
        enable: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_enable(channel, enable, true)
    }

    /// Enables or disables one channel, staged only.
    pub fn set_channel_enable_no_update(
        &mut self,
        channel: u8,
        enable: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_enable(channel, enable, false)
    }

    /// Enables or disables consecutive channels in one burst and commits.
    ///
    /// Each channel's scale field is carried over from the mirror.
    pub fn set_channels_enable(
        &mut self,
        start: u8,
        enable: &[bool],
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_enable_range(start, enable, true)
    }

    /// Enables or disables consecutive channels in one burst, staged only.
    pub fn set_channels_enable_no_update(
        &mut self,
        start: u8,
        enable: &[bool],
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_enable_range(start, enable, false)
    }

    /// Commits all staged PWM and control values in one step.
    ///
    /// A single write of the trigger register; the chip copies every staged
    /// byte into its active registers atomically. On failure the staged
    /// values are left exactly as they were; retry policy belongs to the
    /// caller.
    pub fn update(&mut self) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.ensure_ready()?;
        self.trigger_update()
    }

    /// Enters or leaves software shutdown.
    ///
    /// While asserted, all outputs are forced off but register contents are
    /// retained, so leaving shutdown restores whatever was last committed.
    /// The shutdown register is not double-buffered; no commit is involved.
    pub fn set_software_shutdown(
        &mut self,
        shutdown: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.ensure_ready()?;
        let value = if shutdown { SHUTDOWN_MODE } else { SHUTDOWN_NORMAL };
        self.write_register(REG_SHUTDOWN, value)?;
        self.cache.set_software_shutdown(shutdown);
        Ok(())
    }

    /// Asserts or releases hardware shutdown via the SDB line.
    ///
    /// Fails with [`Error::NotSupported`] when the driver was built without
    /// one. Waking blocks for the startup delay before returning, after
    /// which the chip accepts register traffic again. Orthogonal to software
    /// shutdown; both may be asserted at once.
    pub fn set_hardware_shutdown(
        &mut self,
        shutdown: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.ensure_ready()?;
        let sdb = self.sdb.as_mut().ok_or(Error::NotSupported)?;
        if shutdown {
            sdb.set_low().map_err(Error::Pin)?;
        } else {
            sdb.set_high().map_err(Error::Pin)?;
        }
        self.cache.set_hardware_shutdown(shutdown);
        if !shutdown {
            self.delay.delay_ms(STARTUP_DELAY_MS);
        }
        Ok(())
    }

    /// Returns the mirrored state of one channel.
    ///
    /// Pure cache read; the hardware is presumed, never verified, to match.
    pub fn channel_state(
        &self,
        channel: u8,
    ) -> Result<ChannelState, Error<I2C::Error, SDB::Error>> {
        Self::check_channel(channel)?;
        let (pwm, control) = self.cache.get(channel as usize);
        Ok(ChannelState {
            pwm,
            enabled: is_enabled(control),
            scale: scale_of(control),
        })
    }

    fn write_pwm(
        &mut self,
        channel: u8,
        value: u8,
        update: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.ensure_ready()?;
        Self::check_channel(channel)?;

        self.write_register(pwm_register(channel), value)?;
        self.cache.set_pwm(channel as usize, value);

        if update {
            self.trigger_update()?;
        }
        Ok(())
    }

    fn write_pwm_range(
        &mut self,
        start: u8,
        values: &[u8],
        update: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.ensure_ready()?;
        Self::check_range(start, values.len())?;

        self.write_burst(pwm_register(start), values)?;
        self.cache.copy_pwm_range(start as usize, values);

        if update {
            self.trigger_update()?;
        }
        Ok(())
    }

    fn write_scale(
        &mut self,
        channel: u8,
        scale: CurrentScale,
        update: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        let value = |control| with_scale(control, scale);
        self.write_control_field(channel, value, update)
    }

    fn write_enable(
        &mut self,
        channel: u8,
        enable: bool,
        update: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        let value = |control| with_enable(control, enable);
        self.write_control_field(channel, value, update)
    }

    /// Read-modify-write of one control register through the mirror.
    fn write_control_field(
        &mut self,
        channel: u8,
        f: impl FnOnce(u8) -> u8,
        update: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.ensure_ready()?;
        Self::check_channel(channel)?;

        let value = f(self.cache.control(channel as usize));
        self.write_register(control_register(channel), value)?;
        self.cache.set_control(channel as usize, value);

        if update {
            self.trigger_update()?;
        }
        Ok(())
    }

    fn write_enable_range(
        &mut self,
        start: u8,
        enable: &[bool],
        update: bool,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.ensure_ready()?;
        Self::check_range(start, enable.len())?;

        let mut run: Vec<u8, NUM_CHANNELS> = Vec::new();
        for (i, &on) in enable.iter().enumerate() {
            let control = with_enable(self.cache.control(start as usize + i), on);
            run.push(control).map_err(|_| Error::OutOfRange)?;
        }

        self.write_burst(control_register(start), &run)?;
        self.cache.copy_control_range(start as usize, &run);

        if update {
            self.trigger_update()?;
        }
        Ok(())
    }

    fn trigger_update(&mut self) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.write_register(REG_UPDATE, UPDATE_TRIGGER)
    }

    fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::Bus)
    }

    /// One I2C transaction covering consecutive registers; the chip
    /// auto-increments the register pointer.
    fn write_burst(
        &mut self,
        start_register: u8,
        values: &[u8],
    ) -> Result<(), Error<I2C::Error, SDB::Error>> {
        let mut frame: Vec<u8, FRAME_CAPACITY> = Vec::new();
        frame.push(start_register).map_err(|_| Error::OutOfRange)?;
        frame
            .extend_from_slice(values)
            .map_err(|_| Error::OutOfRange)?;
        self.i2c.write(self.address, &frame).map_err(Error::Bus)
    }

    fn ensure_ready(&self) -> Result<(), Error<I2C::Error, SDB::Error>> {
        if self.cache.initialized() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn check_channel(channel: u8) -> Result<(), Error<I2C::Error, SDB::Error>> {
        if (channel as usize) < NUM_CHANNELS {
            Ok(())
        } else {
            Err(Error::OutOfRange)
        }
    }

    fn check_range(start: u8, len: usize) -> Result<(), Error<I2C::Error, SDB::Error>> {
        if len == 0 {
            return Err(Error::InvalidArgument);
        }
        if (start as usize) >= NUM_CHANNELS || (start as usize) + len > NUM_CHANNELS {
            return Err(Error::OutOfRange);
        }
        Ok(())
    }
}
