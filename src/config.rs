//! Sweep configuration / register code calculations

use crate::{
    clock::ClockSource,
    constants::*,
    errors::*,
    frequency::FrequencyCode,
    register::*,
};


/// Frequency sweep parameters.
///
/// The sweep measures `increments + 1` points, at
/// `start_hz + i * increment_hz` for `i` in `0..=increments`.
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SweepConfigFields"))]
pub struct SweepConfig {
    start_hz: f64,
    increment_hz: f64,
    increments: u16,
    range: ExcitationRange,
    gain: PgaGain,
    settling: SettlingTime,
    clock: ClockSource,
}

/// Unchecked `SweepConfig` as it comes off the wire
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SweepConfigFields {
    start_hz: f64,
    increment_hz: f64,
    increments: u16,
    range: ExcitationRange,
    gain: PgaGain,
    settling: SettlingTime,
    clock: ClockSource,
}

#[cfg(feature = "serde")]
impl TryFrom<SweepConfigFields> for SweepConfig {
    type Error = ConfigError;

    fn try_from(f: SweepConfigFields) -> Result<Self, ConfigError> {
        Ok(SweepConfig::new(f.start_hz, f.increment_hz, f.increments)?
            .range(f.range)
            .gain(f.gain)
            .settling(f.settling)
            .clock(f.clock))
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            start_hz: 30_000.0,
            increment_hz: 100.0,
            increments: 50,
            range: ExcitationRange::V2p0,
            gain: PgaGain::X1,
            settling: SettlingTime::default(),
            clock: ClockSource::Internal,
        }
    }
}

impl SweepConfig {

    /// New sweep, 2 V p-p, PGA x1, default settling time, internal clock.
    ///
    /// `start_hz` - first point, > 0
    /// `increment_hz` - step between points, >= 0
    /// `increments` - number of steps, 0 to 511
    pub fn new(start_hz: f64, increment_hz: f64, increments: u16) -> Result<Self, ConfigError> {
        if !(start_hz.is_finite() && start_hz > 0.0) {
            return Err(ConfigError::InvalidFrequency);
        }
        if !(increment_hz.is_finite() && increment_hz >= 0.0) {
            return Err(ConfigError::InvalidFrequency);
        }
        if increments > MAX_INCREMENTS {
            return Err(ConfigError::InvalidIncrements);
        }

        Ok(SweepConfig {
            start_hz,
            increment_hz,
            increments,
            ..SweepConfig::default()
        })
    }

    pub fn range(self: Self, range: ExcitationRange) -> Self {
        SweepConfig { range, ..self }
    }

    pub fn gain(self: Self, gain: PgaGain) -> Self {
        SweepConfig { gain, ..self }
    }

    pub fn settling(self: Self, settling: SettlingTime) -> Self {
        SweepConfig { settling, ..self }
    }

    pub fn clock(self: Self, clock: ClockSource) -> Self {
        SweepConfig { clock, ..self }
    }

    pub fn start_hz(self: &Self) -> f64 { self.start_hz }

    pub fn increment_hz(self: &Self) -> f64 { self.increment_hz }

    pub fn increments(self: &Self) -> u16 { self.increments }

    pub fn excitation_range(self: &Self) -> ExcitationRange { self.range }

    pub fn pga_gain(self: &Self) -> PgaGain { self.gain }

    pub fn settling_time(self: &Self) -> SettlingTime { self.settling }

    pub fn clock_source(self: &Self) -> ClockSource { self.clock }

    /// Number of points the device measures
    pub fn points(self: &Self) -> usize {
        self.increments as usize + 1
    }

    /// Host side frequency of point `index`
    #[inline]
    pub fn frequency_at(self: &Self, index: u16) -> f64 {
        self.start_hz + index as f64 * self.increment_hz
    }

    /// Start frequency register code
    pub fn start_code(self: &Self) -> FrequencyCode {
        FrequencyCode::from_hz(self.start_hz, self.clock.dds_clock_hz())
    }

    /// Frequency increment register code
    pub fn increment_code(self: &Self) -> FrequencyCode {
        FrequencyCode::from_hz(self.increment_hz, self.clock.dds_clock_hz())
    }

    /// Control word for the configuration write, part stays in standby
    pub fn control_word(self: &Self) -> ControlWord {
        ControlWord {
            mode: Mode::Standby,
            range: self.range,
            gain: self.gain,
            clock: self.clock.select(),
        }
    }

    /// Number of increments register bytes, upper 7 bits always clear
    pub fn increments_bytes(self: &Self) -> [u8; 2] {
        (self.increments & MAX_INCREMENTS).to_be_bytes()
    }
}
