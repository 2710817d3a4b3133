//! System clock config
//! Internal oscillator / external MCLK, DDS clock divider

use crate::{constants::*, errors::*, register::ClockSelect};


/// Frequency of a clock on the MCLK pin, Hz. Always positive and finite.
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct ExternalClock(f64);

impl ExternalClock {
    pub fn hz(self: &Self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ExternalClock {
    type Error = ConfigError;

    fn try_from(f: f64) -> Result<Self, ConfigError> {
        if !(f.is_finite() && f > 0.0) {
            return Err(ConfigError::InvalidFrequency);
        }
        Ok(ExternalClock(f))
    }
}

impl From<ExternalClock> for f64 {
    fn from(c: ExternalClock) -> f64 { c.0 }
}


/// System clock source
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClockSource {
    /// On-chip oscillator, 16 MHz nominal
    Internal,
    /// Clock applied to the MCLK pin
    External(ExternalClock),
}

impl Default for ClockSource {
    fn default() -> Self { ClockSource::Internal }
}

impl ClockSource {

    /// External clock source, `f` in Hz
    pub fn external(f: f64) -> Result<Self, ConfigError> {
        Ok(ClockSource::External(ExternalClock::try_from(f)?))
    }

    /// Master clock frequency, Hz
    pub fn mclk_hz(self: &Self) -> f64 {
        match *self {
            ClockSource::Internal => MCLK_INTERNAL_HZ,
            ClockSource::External(c) => c.hz(),
        }
    }

    /// DDS core clock, MCLK / 4.
    /// Frequency codes are expressed against this clock.
    pub fn dds_clock_hz(self: &Self) -> f64 {
        self.mclk_hz() / DDS_CLOCK_DIVIDER
    }

    /// Control register clock select bit
    pub fn select(self: &Self) -> ClockSelect {
        match self {
            ClockSource::Internal => ClockSelect::Internal,
            ClockSource::External(_) => ClockSelect::External,
        }
    }
}
