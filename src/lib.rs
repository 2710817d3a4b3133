#![cfg_attr(not(test), no_std)]

//! [AD5933](https://www.analog.com/en/products/ad5933.html) driver.
//!
//! 1 MSPS, 12-bit impedance converter with a DDS excitation source
//! and an on-chip DFT. Register access over I2C.

pub mod constants;
pub mod register;
pub mod errors;
pub mod clock;
pub mod frequency;
pub mod config;
pub mod bus;
pub mod device;
pub mod sample;
pub mod sweep;

pub use crate::{
    clock::{ClockSource, ExternalClock},
    config::SweepConfig,
    device::Ad5933,
    errors::{ConfigError, Error},
    register::{ExcitationRange, PgaGain, SettlingMultiplier, SettlingTime},
    sample::{GainFactor, Sample},
    sweep::{Sweep, SweepState},
};
