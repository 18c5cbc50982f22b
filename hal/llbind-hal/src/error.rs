//! Error type shared by every shim
//!
//! Shims return `Result<_, HalError>`. The numeric codes of the command
//! ABI are recovered with [`HalError::code`].

use crate::i2c::I2cError;

/// Errors reported by the peripheral shims and the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Port, pin, bus or channel index not present in the peripheral table
    InvalidIndex,
    /// Argument outside its valid range (zero frequency, zero baud rate...)
    InvalidArgument,
    /// Flag word or control code with no defined decoding
    InvalidFlags,
    /// DMA direction bits undefined
    InvalidDirection,
    /// DMA source data width undefined
    InvalidSrcSize,
    /// DMA destination data width undefined
    InvalidDstSize,
    /// DMA source and destination buffer sizes are both zero
    InvalidBufferSize,
    /// I2C backend failure
    I2c(I2cError),
    /// Command id unknown, or not implemented by this chip
    UnknownCommand,
}

impl HalError {
    /// Numeric code of the command ABI
    ///
    /// `-1` is the generic failure bucket, `-2..=-5` are the differentiated
    /// validation codes and `-1000` is reserved for unknown commands.
    pub const fn code(self) -> i32 {
        match self {
            HalError::InvalidIndex | HalError::InvalidArgument | HalError::I2c(_) => -1,
            HalError::InvalidFlags | HalError::InvalidDirection => -2,
            HalError::InvalidSrcSize => -3,
            HalError::InvalidDstSize => -4,
            HalError::InvalidBufferSize => -5,
            HalError::UnknownCommand => -1000,
        }
    }
}

impl From<I2cError> for HalError {
    fn from(e: I2cError) -> Self {
        HalError::I2c(e)
    }
}
