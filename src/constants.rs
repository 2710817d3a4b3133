//! Constants

/// 7-bit I2C address, fixed in silicon
pub const ADDRESS: u8 = 0x0D;

/// Control register, D15..D8 (mode, range, PGA gain)
pub const REG_CONTROL: u8 = 0x80;

/// Start frequency, 24 bits, MSB first
pub const REG_START_FREQ: u8 = 0x82;

/// Frequency increment, 24 bits, MSB first
pub const REG_FREQ_INCR: u8 = 0x85;

/// Number of increments, 9 bits in a 16 bit register
pub const REG_NUM_INCR: u8 = 0x88;

/// Settling time cycles, 9 bit count + 2 bit multiplier
pub const REG_SETTLE_CYCLES: u8 = 0x8A;

/// Status register (read only)
pub const REG_STATUS: u8 = 0x8F;

/// Temperature data, 14 bit two's complement
pub const REG_TEMP_DATA: u8 = 0x92;

/// Real part of the DFT result, 16 bit two's complement
pub const REG_REAL: u8 = 0x94;

/// Imaginary part of the DFT result, 16 bit two's complement
pub const REG_IMAG: u8 = 0x96;

/// Widest register on the part (frequency words)
pub const MAX_REG_BYTES: usize = 3;

/// Nominal internal oscillator frequency
pub const MCLK_INTERNAL_HZ: f64 = 16_000_000.0;

/// The DDS core is clocked at MCLK / 4
pub const DDS_CLOCK_DIVIDER: f64 = 4.0;

/// Frequency codes are MCLK/4 scaled by 2^27
pub const FREQ_CODE_SCALE: f64 = (1u32 << 27) as f64;

/// Start and increment codes are 24 bit words
pub const FREQ_CODE_MASK: u32 = 0x00FF_FFFF;

/// Number of increments register holds 9 valid bits
pub const MAX_INCREMENTS: u16 = 511;

/// Settling time cycle count field is 9 bits wide
pub const MAX_SETTLING_CYCLES: u16 = 511;

/// Default settling time: 15 output cycles
pub const DEFAULT_SETTLING_CYCLES: u16 = 15;

/// Total attempts for a single register transfer
pub const BUS_ATTEMPTS: u8 = 3;

/// Wait between failed transfer attempts, ms
pub const BUS_RETRY_DELAY_MS: u16 = 50;

/// The part needs time to latch register contents after a write, ms
pub const WRITE_SETTLE_MS: u16 = 10;

/// Wait after each power mode change during reset, ms
pub const RESET_DELAY_MS: u16 = 100;

/// Wait after "initialize with start frequency" and "start sweep", ms
pub const SWEEP_START_DELAY_MS: u16 = 20;

/// Wait after "increment frequency", ms
pub const INCREMENT_DELAY_MS: u16 = 5;

/// Data-ready polls per sweep point
pub const DATA_POLL_ATTEMPTS: u8 = 20;

/// Interval between data-ready polls, ms
pub const DATA_POLL_INTERVAL_MS: u16 = 2;

/// Temperature-ready polls
pub const TEMP_POLL_ATTEMPTS: u8 = 20;

/// Interval between temperature-ready polls, ms
pub const TEMP_POLL_INTERVAL_MS: u16 = 50;

/// Temperature LSB, degrees C
pub const TEMP_LSB_C: f32 = 32.0;

/// Temperature data is a 14 bit field
pub const TEMP_DATA_MASK: u16 = 0x3FFF;

/// Sign bit of the 14 bit temperature field
pub const TEMP_SIGN_BIT: u16 = 0x2000;

/// 2^14, subtracted from negative temperature codes
pub const TEMP_SIGN_OFFSET: i32 = 16384;
