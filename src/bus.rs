//! Register access over I2C

use embedded_hal::blocking::{
    delay::DelayMs,
    i2c::{Write, WriteRead},
};

use crate::{constants::*, errors::*, register::*};


/// Runs `op` up to `attempts` times, waiting `delay_ms` between attempts.
/// Returns the first success or the last error.
pub fn with_retry<T, E, D, F>(
    attempts: u8,
    delay: &mut D,
    delay_ms: u16,
    mut op: F,
) -> Result<T, E>
where D: DelayMs<u16>,
      F: FnMut() -> Result<T, E>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= attempts => return Err(e),
            Err(_) => {
                log::warn!("bus fault, attempt {}/{}", attempt, attempts);
                delay.delay_ms(delay_ms);
                attempt += 1;
            }
        }
    }
}


/// AD5933 register access: one register per transfer, bounded retries.
pub struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
    trace: bool,
}

impl<I2C, E> RegisterBus<I2C>
where I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        RegisterBus { i2c, address, trace: false }
    }

    /// Log every transfer at trace level
    pub fn set_trace(self: &mut Self, trace: bool) {
        self.trace = trace;
    }

    pub fn trace(self: &Self) -> bool {
        self.trace
    }

    pub fn address(self: &Self) -> u8 {
        self.address
    }

    pub fn release(self: Self) -> I2C {
        self.i2c
    }

    /// Writes `data` starting at `reg`, MSB first.
    /// Blocking call.
    ///
    /// A successful write is always followed by a settle delay,
    /// the part needs it to latch the register.
    pub fn write_register<D>(
        self: &mut Self,
        delay: &mut D,
        reg: Register,
        data: &[u8],
    ) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        if data.len() > reg.width() {
            return Err(Error::PayloadTooLong);
        }

        let mut frame = [0u8; MAX_REG_BYTES + 1];
        frame[0] = reg.addr();
        frame[1..=data.len()].copy_from_slice(data);
        let frame = &frame[..=data.len()];

        if self.trace {
            log::trace!("write {:#04x}: {:02x?}", reg.addr(), data);
        }

        let (i2c, address) = (&mut self.i2c, self.address);
        with_retry(BUS_ATTEMPTS, delay, BUS_RETRY_DELAY_MS, || i2c.write(address, frame))
            .map_err(|e| {
                log::warn!("write {:#04x} failed after {} attempts", reg.addr(), BUS_ATTEMPTS);
                Error::Bus(e)
            })?;

        delay.delay_ms(WRITE_SETTLE_MS);
        Ok(())
    }

    /// Single byte write
    #[inline]
    pub fn write_byte<D>(
        self: &mut Self,
        delay: &mut D,
        reg: Register,
        value: u8,
    ) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        self.write_register(delay, reg, &[value])
    }

    /// Reads `buf.len()` bytes starting at `reg`.
    /// Blocking call.
    pub fn read_register<D>(
        self: &mut Self,
        delay: &mut D,
        reg: Register,
        buf: &mut [u8],
    ) -> Result<(), Error<E>>
    where D: DelayMs<u16>,
    {
        let (i2c, address) = (&mut self.i2c, self.address);
        with_retry(BUS_ATTEMPTS, delay, BUS_RETRY_DELAY_MS, || i2c.write_read(address, &[reg.addr()], buf))
            .map_err(|e| {
                log::warn!("read {:#04x} failed after {} attempts", reg.addr(), BUS_ATTEMPTS);
                Error::Bus(e)
            })?;

        if self.trace {
            log::trace!("read {:#04x}: {:02x?}", reg.addr(), buf);
        }
        Ok(())
    }

    /// Reads a 16 bit register
    pub fn read_u16<D>(
        self: &mut Self,
        delay: &mut D,
        reg: Register,
    ) -> Result<u16, Error<E>>
    where D: DelayMs<u16>,
    {
        let mut buf = [0u8; 2];
        self.read_register(delay, reg, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Reads the status register, never cached
    pub fn status<D>(self: &mut Self, delay: &mut D) -> Result<Status, Error<E>>
    where D: DelayMs<u16>,
    {
        let mut buf = [0u8; 1];
        self.read_register(delay, Register::Status, &mut buf)?;
        Ok(Status(buf[0]))
    }

    /// Non-blocking check for a status flag
    pub fn try_flag<D>(self: &mut Self, delay: &mut D, flag: u8) -> nb::Result<Status, Error<E>>
    where D: DelayMs<u16>,
    {
        let status = self.status(delay)?;
        if status.contains(flag) {
            Ok(status)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Polls the status register until `flag` is set.
    /// At most `attempts` reads, `interval_ms` apart, no wait after the last.
    pub fn poll_flag<D>(
        self: &mut Self,
        delay: &mut D,
        flag: u8,
        attempts: u8,
        interval_ms: u16,
    ) -> Result<Status, Error<E>>
    where D: DelayMs<u16>,
    {
        for attempt in 1..=attempts {
            match self.try_flag(delay, flag) {
                Ok(status) => return Ok(status),
                Err(nb::Error::WouldBlock) if attempt < attempts => delay.delay_ms(interval_ms),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        log::debug!("status flag {:#04x} not set after {} polls", flag, attempts);
        Err(Error::Timeout)
    }
}
