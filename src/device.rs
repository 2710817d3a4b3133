//! Device control

use embedded_hal::blocking::{
    delay::DelayMs,
    i2c::{Write, WriteRead},
};

use crate::{
    bus::RegisterBus,
    config::SweepConfig,
    constants::*,
    errors::*,
    register::*,
    sweep::Sweep,
};


/// AD5933 device
pub struct Ad5933<I2C> {
    bus: RegisterBus<I2C>,
    /// Range, gain and clock of the last configuration write,
    /// carried along with every later mode change.
    control: ControlWord,
}


impl<I2C, E> Ad5933<I2C>
where I2C: Write<Error = E> + WriteRead<Error = E>,
{
    /// Creates the device (unconfigured).
    ///
    /// `i2c` - I2C bus, the part answers at 0x0D
    pub fn new(i2c: I2C) -> Self {
        Ad5933 {
            bus: RegisterBus::new(i2c, ADDRESS),
            control: ControlWord::default(),
        }
    }

    /// Enables register tracing at `log::Level::Trace`
    pub fn with_trace(mut self: Self, trace: bool) -> Self {
        self.bus.set_trace(trace);
        self
    }

    pub fn set_trace(self: &mut Self, trace: bool) {
        self.bus.set_trace(trace);
    }

    /// Releases the I2C bus
    pub fn release(self: Self) -> I2C {
        self.bus.release()
    }

    /// Register access layer. Crate only, raw control writes would
    /// leave the cached control word stale.
    pub(crate) fn bus(self: &mut Self) -> &mut RegisterBus<I2C> {
        &mut self.bus
    }

    /// Last written control register contents
    pub fn control(self: &Self) -> ControlWord {
        self.control
    }

    /// Writes a mode to the control register, keeping range and gain.
    pub fn set_mode<D>(self: &mut Self, delay: &mut D, mode: Mode) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        let control = self.control.with_mode(mode);
        self.bus.write_byte(delay, Register::Control, control.high_byte())?;
        self.control = control;
        Ok(())
    }

    /// Checks that the part answers on the bus.
    pub fn probe<D>(self: &mut Self, delay: &mut D) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        match self.bus.status(delay) {
            Ok(_) => Ok(()),
            Err(Error::Bus(_)) => Err(Error::NotConnected),
            Err(e) => Err(e),
        }
    }

    /// Power-down mode, no excitation
    pub fn power_down<D>(self: &mut Self, delay: &mut D) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        self.set_mode(delay, Mode::PowerDown)
    }

    /// Standby mode, output biased at mid supply
    pub fn standby<D>(self: &mut Self, delay: &mut D) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        self.set_mode(delay, Mode::Standby)
    }

    /// Power-down, then standby, then confirm the part still answers.
    ///
    /// The part has to pass through power-down on its way from any
    /// measurement mode to standby.
    pub fn reset<D>(self: &mut Self, delay: &mut D) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        self.power_down(delay)?;
        delay.delay_ms(RESET_DELAY_MS);

        self.standby(delay)?;
        delay.delay_ms(RESET_DELAY_MS);

        self.bus.status(delay)?;
        Ok(())
    }

    /// Resets the part and programs every sweep register.
    ///
    /// Stops at the first failed write; a partial configuration is
    /// a failed configuration.
    pub fn configure_sweep<D>(self: &mut Self, delay: &mut D, config: &SweepConfig) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        self.reset(delay)?;

        let control = config.control_word();
        self.bus.write_register(delay, Register::Control, &control.to_be_bytes())?;
        self.control = control;

        let start = config.start_code();
        let increment = config.increment_code();
        log::debug!(
            "sweep {} Hz + {} x {} Hz, codes {:#08x} {:#08x}",
            config.start_hz(), config.increments(), config.increment_hz(), start.0, increment.0,
        );
        if !(start.fits() && increment.fits()) {
            log::warn!("frequency code exceeds 24 bits, truncated");
        }

        self.bus.write_register(delay, Register::StartFrequency, &start.to_be_bytes())?;
        self.bus.write_register(delay, Register::FrequencyIncrement, &increment.to_be_bytes())?;
        self.bus.write_register(delay, Register::NumIncrements, &config.increments_bytes())?;
        self.bus.write_register(delay, Register::SettlingCycles, &config.settling_time().to_be_bytes())?;

        Ok(())
    }

    /// Programs the settling time register.
    ///
    /// `cycles` - 0 to 511
    /// `multiplier` - 1, 2 or 4
    ///
    /// Independent of [`Ad5933::configure_sweep`], which writes the
    /// settling time of its own config; whichever runs last wins.
    pub fn configure_settling_time<D>(self: &mut Self, delay: &mut D, cycles: u16, multiplier: u8) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        let settling = SettlingTime::new(cycles, SettlingMultiplier::from_factor(multiplier)?)?;
        self.write_settling_time(delay, &settling)
    }

    pub fn write_settling_time<D>(self: &mut Self, delay: &mut D, settling: &SettlingTime) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        self.bus.write_register(delay, Register::SettlingCycles, &settling.to_be_bytes())
    }

    /// Re-measures the current frequency point
    pub fn repeat_frequency<D>(self: &mut Self, delay: &mut D) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        self.set_mode(delay, Mode::RepeatFrequency)
    }

    /// Die temperature, degrees C.
    ///
    /// `Error::Timeout` if the conversion does not complete within the
    /// poll budget. Aborts a sweep in progress.
    pub fn measure_temperature<D>(self: &mut Self, delay: &mut D) -> Result<f32, Error<E>>
    where D: DelayMs<u16>,
    {
        self.set_mode(delay, Mode::MeasureTemperature)?;
        self.bus.poll_flag(delay, Status::TEMPERATURE_VALID, TEMP_POLL_ATTEMPTS, TEMP_POLL_INTERVAL_MS)?;
        let raw = self.bus.read_u16(delay, Register::TemperatureData)?;
        Ok(temperature_c(raw))
    }

    /// Lazily runs a full sweep, one [`Sample`](crate::sample::Sample) per call to `next`.
    ///
    /// Nothing touches the bus until the first sample is requested.
    pub fn sweep<'a, D>(self: &'a mut Self, delay: &'a mut D, config: &SweepConfig) -> Sweep<'a, I2C, D, E>
    where D: DelayMs<u16>,
    {
        Sweep::new(self, delay, *config)
    }
}


/// Converts the temperature register to degrees C.
/// 14 bit two's complement, 1/32 degree per LSB.
pub fn temperature_c(raw: u16) -> f32 {
    let raw = raw & TEMP_DATA_MASK;
    let code = if raw & TEMP_SIGN_BIT != 0 {
        raw as i32 - TEMP_SIGN_OFFSET
    } else {
        raw as i32
    };
    code as f32 / TEMP_LSB_C
}
