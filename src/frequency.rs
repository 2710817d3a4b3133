//! Frequency calculations

use crate::constants::*;


/// DDS frequency code.
///
/// code = round(f × 2^27 / (MCLK / 4))
///
/// The start frequency and frequency increment registers hold the
/// low 24 bits of the code, MSB first.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct FrequencyCode(pub u32);

impl FrequencyCode {

    /// Code for `f_hz` against a DDS clock of `dds_clock_hz` (MCLK / 4).
    /// Negative and NaN inputs give 0.
    pub fn from_hz(f_hz: f64, dds_clock_hz: f64) -> Self {
        let scaled = libm::round(f_hz * FREQ_CODE_SCALE / dds_clock_hz);
        FrequencyCode(scaled as u32) // saturating cast
    }

    /// Frequency this code produces, Hz
    pub fn to_hz(self: &Self, dds_clock_hz: f64) -> f64 {
        self.0 as f64 * dds_clock_hz / FREQ_CODE_SCALE
    }

    /// Frequency resolution, Hz per code step
    pub fn resolution_hz(dds_clock_hz: f64) -> f64 {
        dds_clock_hz / FREQ_CODE_SCALE
    }

    /// Whether the code fits the 24 bit registers without truncation
    pub fn fits(self: &Self) -> bool {
        self.0 & !FREQ_CODE_MASK == 0
    }

    /// Register bytes, low 24 bits, MSB first
    pub fn to_be_bytes(self: &Self) -> [u8; 3] {
        let w = self.0 & FREQ_CODE_MASK;
        [
            ((w >> 16) & 0xFF) as u8,
            ((w >>  8) & 0xFF) as u8,
            ( w        & 0xFF) as u8,
        ]
    }
}
