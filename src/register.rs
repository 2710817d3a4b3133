//! AD5933 registers

use core::marker::PhantomData;

use crate::{constants::*, errors::ConfigError};


/// Register map.
///
/// Multi-byte registers are big-endian: the named address holds the
/// most significant byte, the following addresses hold the rest.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    Control,
    StartFrequency,
    FrequencyIncrement,
    NumIncrements,
    SettlingCycles,
    Status,
    TemperatureData,
    RealData,
    ImaginaryData,
}

impl Register {
    /// Every register, in address order
    pub const ALL: [Register; 9] = [
        Register::Control,
        Register::StartFrequency,
        Register::FrequencyIncrement,
        Register::NumIncrements,
        Register::SettlingCycles,
        Register::Status,
        Register::TemperatureData,
        Register::RealData,
        Register::ImaginaryData,
    ];

    /// Address of the most significant byte
    #[inline]
    pub const fn addr(self) -> u8 {
        match self {
            Register::Control => REG_CONTROL,
            Register::StartFrequency => REG_START_FREQ,
            Register::FrequencyIncrement => REG_FREQ_INCR,
            Register::NumIncrements => REG_NUM_INCR,
            Register::SettlingCycles => REG_SETTLE_CYCLES,
            Register::Status => REG_STATUS,
            Register::TemperatureData => REG_TEMP_DATA,
            Register::RealData => REG_REAL,
            Register::ImaginaryData => REG_IMAG,
        }
    }

    /// Width in bytes
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            Register::StartFrequency | Register::FrequencyIncrement => 3,
            Register::Status => 1,
            _ => 2,
        }
    }
}


/// Register word marker types
macro_rules! gen_register_marker {
    ($(#[$meta:meta])* $r:ident) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq,Eq)]
        pub struct $r {}
    }
}

gen_register_marker!(
    /// Control register word (0x80, 0x81)
    Ctrl
);
gen_register_marker!(
    /// Settling time cycles word (0x8A, 0x8B)
    Settle
);


/// Single 16 bit register word
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct Reg<R> {
    /// Register word, D15..D0
    pub w: u16,
    phantom: PhantomData<R>,
}

impl<R> Default for Reg<R> {
    #[inline]
    fn default() -> Self { Reg::new(0) }
}

/// Bit operations on 16bit words
impl<R> Reg<R> {
    #[inline]
    pub fn new(w: u16) -> Self {
        Reg { w, phantom: PhantomData }
    }

    #[inline]
    pub fn get<F>(self: &Self) -> F
    where F: Sized + BitField<R> + From<u16>
    {
        F::from(
            (self.w >> F::offset()) & F::mask()
        )
    }

    #[inline]
    pub fn set<F>(mut self: Self, f: F) -> Self
    where F: Sized + BitField<R> + Into<u16>
    {
        let fbits = (f.into() & F::mask()) << F::offset();
        let rbits = self.w & (! ( F::mask() << F::offset() ));
        self.w = rbits | fbits;
        self
    }

    /// Register bytes in device order, MSB first
    #[inline]
    pub fn to_be_bytes(self: &Self) -> [u8; 2] {
        self.w.to_be_bytes()
    }
}


/// Bit operations on 16bit words
pub trait BitField<R> {
    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    #[inline]
    fn mask() -> u16 {
        !(0xFFFFu16 << Self::num_bits())
    }
}

/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
	($r:ty, $n:ident, $nb:tt, $off:tt) => {
        impl BitField<$r> for $n {
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
        }
    }
}

/// Small bitfield-encoded numbes boilerplate
macro_rules! gen_bitfield_struct {
	($(#[$meta:meta])*, $r:ty, $n:ident, $v:ty, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq,Eq)]
        pub struct $n(pub $v);

        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<u16> for $n { #[inline] fn from(x: u16) -> Self { $n(x as $v) } }
        impl From<$n> for u16 { #[inline] fn from(x: $n) -> u16 { x.0 as u16 } }
	};
}

/// Write-only enum fields, discriminant is the field value
macro_rules! gen_bitfield_enum {
	($r:ty, $n:ident, $nb:tt, $off:tt) => {
        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<$n> for u16 { #[inline] fn from(x: $n) -> u16 { x as u16 } }
    }
}


/// Control register Bits[D15:D12] select the function the part performs.
/// Writing a mode does not reset the rest of the register, but the part
/// always takes the whole high byte at once, so range and gain have to
/// travel with every mode change.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Mode {
    NoOperation = 0x0,
    /// Enables the DDS output at the start frequency, no measurement yet.
    /// Allow the impedance to settle before starting the sweep.
    InitStartFrequency = 0x1,
    /// Starts the ADC conversion at the start frequency
    StartSweep = 0x2,
    /// Steps to the next frequency point
    IncrementFrequency = 0x3,
    /// Re-measures the current frequency point
    RepeatFrequency = 0x4,
    /// Starts a single temperature conversion
    MeasureTemperature = 0x9,
    /// No excitation, VOUT and VIN tied to ground internally
    PowerDown = 0xA,
    /// VOUT and VIN at mid supply, no excitation
    Standby = 0xB,
}
gen_bitfield_enum!(Ctrl, Mode, 4, 12);


/// Output excitation voltage range, Bits[D10:D9].
/// Values are for a 3.3 V supply; the output scales with VDD.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExcitationRange {
    /// Range 1, 2.0 V p-p
    V2p0 = 0b00,
    /// Range 4, 200 mV p-p
    Mv200 = 0b01,
    /// Range 3, 400 mV p-p
    Mv400 = 0b10,
    /// Range 2, 1.0 V p-p
    V1p0 = 0b11,
}
gen_bitfield_enum!(Ctrl, ExcitationRange, 2, 9);

impl ExcitationRange {
    /// Range by its datasheet number, 1 to 4
    pub fn from_code(code: u8) -> Result<Self, ConfigError> {
        match code {
            1 => Ok(ExcitationRange::V2p0),
            2 => Ok(ExcitationRange::V1p0),
            3 => Ok(ExcitationRange::Mv400),
            4 => Ok(ExcitationRange::Mv200),
            _ => Err(ConfigError::InvalidRange),
        }
    }

    /// Datasheet range number, 1 to 4
    pub fn code(self) -> u8 {
        match self {
            ExcitationRange::V2p0 => 1,
            ExcitationRange::V1p0 => 2,
            ExcitationRange::Mv400 => 3,
            ExcitationRange::Mv200 => 4,
        }
    }
}


/// Receive stage PGA gain, Bit D8
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PgaGain {
    X5 = 0,
    X1 = 1,
}
gen_bitfield_enum!(Ctrl, PgaGain, 1, 8);


/// System clock source, Bit D3
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum ClockSelect {
    Internal = 0,
    External = 1,
}
gen_bitfield_enum!(Ctrl, ClockSelect, 1, 3);


/// Control register contents.
///
/// The register is kept as named fields, the device word is produced
/// on demand by [`ControlWord::word`].
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct ControlWord {
    pub mode: Mode,
    pub range: ExcitationRange,
    pub gain: PgaGain,
    pub clock: ClockSelect,
}

impl Default for ControlWord {
    fn default() -> Self {
        ControlWord {
            mode: Mode::Standby,
            range: ExcitationRange::V2p0,
            gain: PgaGain::X1,
            clock: ClockSelect::Internal,
        }
    }
}

impl ControlWord {
    /// Same range, gain and clock with a different mode
    #[inline]
    pub fn with_mode(self: Self, mode: Mode) -> Self {
        ControlWord { mode, ..self }
    }

    /// Device word, D15..D0
    pub fn word(self: &Self) -> Reg<Ctrl> {
        Reg::<Ctrl>::default()
            .set(self.mode)
            .set(self.range)
            .set(self.gain)
            .set(self.clock)
    }

    /// Both control bytes, 0x80 then 0x81
    #[inline]
    pub fn to_be_bytes(self: &Self) -> [u8; 2] {
        self.word().to_be_bytes()
    }

    /// Register 0x80 only: mode, range and gain
    #[inline]
    pub fn high_byte(self: &Self) -> u8 {
        self.to_be_bytes()[0]
    }
}


gen_bitfield_struct!(
    /// Bits[D8:D0] set the number of output excitation cycles that
    /// pass through the unknown impedance after a frequency change
    /// and before the ADC is triggered. 0 to 511.
    , Settle, SettlingCycles, u16, 9, 0
);

/// Bits[D10:D9] multiply the settling cycle count.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettlingMultiplier {
    X1 = 0b00,
    X2 = 0b01,
    X4 = 0b11,
}
gen_bitfield_enum!(Settle, SettlingMultiplier, 2, 9);

impl SettlingMultiplier {
    /// Multiplier by its factor: 1, 2 or 4
    pub fn from_factor(factor: u8) -> Result<Self, ConfigError> {
        match factor {
            1 => Ok(SettlingMultiplier::X1),
            2 => Ok(SettlingMultiplier::X2),
            4 => Ok(SettlingMultiplier::X4),
            _ => Err(ConfigError::InvalidSettlingTime),
        }
    }

    pub fn factor(self) -> u16 {
        match self {
            SettlingMultiplier::X1 => 1,
            SettlingMultiplier::X2 => 2,
            SettlingMultiplier::X4 => 4,
        }
    }
}


/// Settling time cycles register contents
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SettlingTimeFields"))]
pub struct SettlingTime {
    cycles: u16,
    multiplier: SettlingMultiplier,
}

/// Unchecked `SettlingTime` as it comes off the wire
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SettlingTimeFields {
    cycles: u16,
    multiplier: SettlingMultiplier,
}

#[cfg(feature = "serde")]
impl TryFrom<SettlingTimeFields> for SettlingTime {
    type Error = ConfigError;

    fn try_from(f: SettlingTimeFields) -> Result<Self, ConfigError> {
        SettlingTime::new(f.cycles, f.multiplier)
    }
}

impl Default for SettlingTime {
    fn default() -> Self {
        SettlingTime { cycles: DEFAULT_SETTLING_CYCLES, multiplier: SettlingMultiplier::X1 }
    }
}

impl SettlingTime {
    pub fn new(cycles: u16, multiplier: SettlingMultiplier) -> Result<Self, ConfigError> {
        if cycles > MAX_SETTLING_CYCLES {
            return Err(ConfigError::InvalidSettlingTime);
        }
        Ok(SettlingTime { cycles, multiplier })
    }

    pub fn cycles(self: &Self) -> u16 { self.cycles }

    pub fn multiplier(self: &Self) -> SettlingMultiplier { self.multiplier }

    /// Effective number of output cycles
    pub fn total_cycles(self: &Self) -> u16 {
        self.cycles * self.multiplier.factor()
    }

    /// Device word, D15..D0
    pub fn word(self: &Self) -> Reg<Settle> {
        Reg::<Settle>::default()
            .set(SettlingCycles(self.cycles))
            .set(self.multiplier)
    }

    #[inline]
    pub fn to_be_bytes(self: &Self) -> [u8; 2] {
        self.word().to_be_bytes()
    }
}


/// Status register (0x8F). Always re-read, never cached.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct Status(pub u8);

impl Status {
    /// D0, valid temperature measurement
    pub const TEMPERATURE_VALID: u8 = 0x01;
    /// D1, valid real/imaginary data
    pub const DATA_VALID: u8 = 0x02;
    /// D2, frequency sweep complete
    pub const SWEEP_COMPLETE: u8 = 0x04;

    #[inline]
    pub fn contains(self: &Self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn temperature_valid(self: &Self) -> bool { self.contains(Self::TEMPERATURE_VALID) }

    pub fn data_valid(self: &Self) -> bool { self.contains(Self::DATA_VALID) }

    pub fn sweep_complete(self: &Self) -> bool { self.contains(Self::SWEEP_COMPLETE) }
}
