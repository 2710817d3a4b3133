//! Sweep sequencer
//!
//! ```text
//! Idle -> Configuring -> Initialized -> Sweeping
//!      -> (per point: Polling -> Reading -> Advancing | Done)
//! ```
//!
//! Every call to `next` runs the state machine until it produces a
//! sample or stops. A failed transfer or a data-ready timeout ends the
//! sweep; the part is left mid sweep and needs a reset before reuse.

use core::iter::FusedIterator;

use embedded_hal::blocking::{
    delay::DelayMs,
    i2c::{Write, WriteRead},
};

use crate::{
    config::SweepConfig,
    constants::*,
    device::Ad5933,
    errors::Error,
    register::*,
    sample::Sample,
};


#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum SweepState {
    /// Nothing sent yet
    Idle,
    /// Reset and sweep register writes
    Configuring,
    /// Registers written, DDS not started
    Initialized,
    /// DDS running at the start frequency
    Sweeping,
    /// Waiting for data-ready on the current point
    Polling,
    /// Fetching the DFT result of the current point
    Reading,
    /// Stepping to the next point
    Advancing,
    /// No more samples
    Done,
}


/// Single pass frequency sweep, see [`Ad5933::sweep`].
///
/// Holds the device and delay borrowed for its whole life, so nothing
/// else can talk to the part while a sweep is in flight.
pub struct Sweep<'a, I2C, D, E> {
    device: &'a mut Ad5933<I2C>,
    delay: &'a mut D,
    config: SweepConfig,
    state: SweepState,
    /// Current point
    index: u16,
    produced: usize,
    error: Option<Error<E>>,
}

impl<'a, I2C, D, E> Sweep<'a, I2C, D, E>
where I2C: Write<Error = E> + WriteRead<Error = E>,
      D: DelayMs<u16>,
{
    pub(crate) fn new(device: &'a mut Ad5933<I2C>, delay: &'a mut D, config: SweepConfig) -> Self {
        Sweep {
            device,
            delay,
            config,
            state: SweepState::Idle,
            index: 0,
            produced: 0,
            error: None,
        }
    }

    pub fn config(self: &Self) -> &SweepConfig {
        &self.config
    }

    pub fn state(self: &Self) -> SweepState {
        self.state
    }

    /// `None` while running, then `Ok` for a complete sweep or the
    /// error that ended it.
    pub fn outcome(self: &Self) -> Option<Result<(), &Error<E>>> {
        match (self.state, &self.error) {
            (SweepState::Done, None) => Some(Ok(())),
            (SweepState::Done, Some(e)) => Some(Err(e)),
            _ => None,
        }
    }

    /// Points not produced yet
    pub fn remaining(self: &Self) -> usize {
        match self.state {
            SweepState::Done => 0,
            _ => self.config.points() - self.produced,
        }
    }

    fn transition(self: &mut Self, next: SweepState) {
        log::debug!("sweep {:?} -> {:?} (point {})", self.state, next, self.index);
        self.state = next;
    }

    fn finish(self: &mut Self, error: Option<Error<E>>) {
        match &error {
            None => log::info!("sweep done, {} points", self.produced),
            Some(_) => log::info!("sweep aborted in {:?} at point {}, {} points", self.state, self.index, self.produced),
        }
        self.error = error;
        self.state = SweepState::Done;
    }

    /// Runs one state. `Ok(Some(_))` when a point is complete.
    fn step(self: &mut Self) -> Result<Option<Sample>, Error<E>> {
        match self.state {
            SweepState::Idle => {
                self.transition(SweepState::Configuring);
            }
            SweepState::Configuring => {
                self.device.configure_sweep(self.delay, &self.config)?;
                self.transition(SweepState::Initialized);
            }
            SweepState::Initialized => {
                self.device.set_mode(self.delay, Mode::InitStartFrequency)?;
                self.delay.delay_ms(SWEEP_START_DELAY_MS);
                self.transition(SweepState::Sweeping);
            }
            SweepState::Sweeping => {
                self.device.set_mode(self.delay, Mode::StartSweep)?;
                self.delay.delay_ms(SWEEP_START_DELAY_MS);
                self.transition(SweepState::Polling);
            }
            SweepState::Polling => {
                self.device.bus().poll_flag(
                    self.delay,
                    Status::DATA_VALID,
                    DATA_POLL_ATTEMPTS,
                    DATA_POLL_INTERVAL_MS,
                )?;
                self.transition(SweepState::Reading);
            }
            SweepState::Reading => {
                let real = self.device.bus().read_u16(self.delay, Register::RealData)? as i16;
                let imaginary = self.device.bus().read_u16(self.delay, Register::ImaginaryData)? as i16;
                let sample = Sample::new(self.config.frequency_at(self.index), real, imaginary);
                self.produced += 1;

                if self.index < self.config.increments() {
                    self.transition(SweepState::Advancing);
                } else {
                    self.finish(None);
                }
                return Ok(Some(sample));
            }
            SweepState::Advancing => {
                self.device.set_mode(self.delay, Mode::IncrementFrequency)?;
                self.delay.delay_ms(INCREMENT_DELAY_MS);
                self.index += 1;
                self.transition(SweepState::Polling);
            }
            SweepState::Done => {}
        }
        Ok(None)
    }
}

impl<'a, I2C, D, E> Iterator for Sweep<'a, I2C, D, E>
where I2C: Write<Error = E> + WriteRead<Error = E>,
      D: DelayMs<u16>,
{
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        while self.state != SweepState::Done {
            match self.step() {
                Ok(Some(sample)) => return Some(sample),
                Ok(None) => {}
                Err(e) => self.finish(Some(e)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl<'a, I2C, D, E> FusedIterator for Sweep<'a, I2C, D, E>
where I2C: Write<Error = E> + WriteRead<Error = E>,
      D: DelayMs<u16>,
{}
