//! USART settings
//!
//! The shims always program 8-N-1 with both directions enabled. The flag
//! word callers pass to `UsartInit` is carried through for the numeric ABI
//! and only shows up in trace output; it does not change the frame format.

use crate::error::HalError;

/// USART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

impl UartConfig {
    /// 8-N-1 at `baudrate`
    pub fn with_baudrate(baudrate: u32) -> Result<Self, HalError> {
        if baudrate == 0 {
            return Err(HalError::InvalidArgument);
        }
        Ok(Self { baudrate })
    }

    /// BRR divider for a peripheral clocked at `pclk_hz`, rounded to nearest
    pub fn divider(&self, pclk_hz: u32) -> u32 {
        (pclk_hz + self.baudrate / 2) / self.baudrate
    }
}

/// USART flag word of `UsartInit`
///
/// Accepted and traced, never decoded: the frame is always 8-N-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsartFlags(pub u32);
