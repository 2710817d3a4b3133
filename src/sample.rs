//! Sweep samples

/// One sweep point.
///
/// The part only reports the DFT result; the frequency is the host side
/// value the point was configured for.
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Excitation frequency, Hz
    pub frequency_hz: f64,
    /// Real part of the DFT result
    pub real: i16,
    /// Imaginary part of the DFT result
    pub imaginary: i16,
    /// sqrt(real^2 + imaginary^2)
    pub magnitude: f64,
}

impl Sample {
    pub fn new(frequency_hz: f64, real: i16, imaginary: i16) -> Self {
        Sample {
            frequency_hz,
            real,
            imaginary,
            magnitude: magnitude(real, imaginary),
        }
    }

    /// Phase of the DFT result, degrees, -180 to 180.
    /// Includes the phase of the measurement system itself.
    pub fn phase_degrees(self: &Self) -> f64 {
        libm::atan2(self.imaginary as f64, self.real as f64) * (180.0 / core::f64::consts::PI)
    }

    /// Impedance magnitude, ohms.
    /// `gain_factor` comes from a sweep over a known impedance at the
    /// same range, gain and frequency.
    pub fn impedance(self: &Self, gain_factor: GainFactor) -> f64 {
        1.0 / (self.magnitude * gain_factor.0)
    }
}

/// sqrt(real^2 + imaginary^2) without intermediate overflow
pub fn magnitude(real: i16, imaginary: i16) -> f64 {
    let (re, im) = (real as f64, imaginary as f64);
    libm::sqrt(re * re + im * im)
}


/// System gain factor: 1 / (impedance × magnitude)
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GainFactor(pub f64);

impl GainFactor {
    /// Gain factor from a measurement of a known impedance
    pub fn calibrate(impedance_ohms: f64, magnitude: f64) -> Self {
        GainFactor(1.0 / (impedance_ohms * magnitude))
    }
}
