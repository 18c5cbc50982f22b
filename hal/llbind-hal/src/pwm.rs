//! PWM control operations

use crate::error::HalError;

/// Timer ticks in one PWM period after `PwmInit`
pub const DEFAULT_PERIOD_TICKS: u32 = 1000;

/// PWM control operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmCtrl {
    /// Enable the output
    On,
    /// Disable the output
    Off,
    /// Compare value in timer ticks
    SetDuty(u32),
    GetDuty,
    /// Largest meaningful duty (the period in ticks)
    GetMaxDuty,
    /// Period in timer ticks
    SetPeriod(u32),
    GetPeriod,
    ActiveHigh,
    ActiveLow,
}

/// Timer prescaler for a PWM frequency
///
/// `clock_hz / freq_hz - 1`, which must fit the 16-bit prescaler register.
pub fn prescaler_for(clock_hz: u32, freq_hz: u32) -> Result<u16, HalError> {
    if freq_hz == 0 || freq_hz > clock_hz {
        return Err(HalError::InvalidArgument);
    }
    u16::try_from(clock_hz / freq_hz - 1).map_err(|_| HalError::InvalidArgument)
}
