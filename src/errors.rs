//! Errors

/// Invalid sweep or settling parameters, caught before any bus traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Start frequency must be positive, increment non-negative, both finite.
    /// External clock frequency must be positive and finite.
    #[error("invalid frequency")]
    InvalidFrequency,

    /// Number of increments is a 9 bit field
    #[error("number of increments out of range")]
    InvalidIncrements,

    /// Settling cycle count is a 9 bit field, multiplier is x1, x2 or x4
    #[error("invalid settling time")]
    InvalidSettlingTime,

    /// Excitation range numbers are 1 to 4
    #[error("invalid excitation range")]
    InvalidRange,
}

/// Driver errors, generic over the I2C bus error.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error<E> {
    /// Bus transfer failed on every attempt
    #[error("I2C transfer failed after retries")]
    Bus(E),

    /// A status flag never came up within the poll budget
    #[error("device not ready")]
    Timeout,

    /// Nothing answered at the device address
    #[error("device not connected")]
    NotConnected,

    /// Payload is wider than the target register
    #[error("payload too long for register")]
    PayloadTooLong,

    #[error("invalid configuration")]
    Config(#[from] ConfigError),
}
