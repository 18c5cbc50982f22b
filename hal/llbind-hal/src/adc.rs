//! ADC control operations

use crate::error::HalError;

/// ADC control operation
#[derive(Debug, PartialEq, Eq)]
pub enum AdcCtrl<'a> {
    /// Continuous conversion, samples delivered as events
    Start,
    /// Stop continuous conversion
    Stop,
    /// Fill the buffer with single conversions
    Convert(&'a mut [u16]),
}

/// Logical ADC channels exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// Internal temperature sensor
    TempSensor,
    /// Internal reference voltage
    Vrefint,
}

impl AdcChannel {
    /// Logical channel 0 is the temperature sensor, 1 is Vrefint
    pub fn from_index(index: u32) -> Result<Self, HalError> {
        match index {
            0 => Ok(AdcChannel::TempSensor),
            1 => Ok(AdcChannel::Vrefint),
            _ => Err(HalError::InvalidIndex),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            AdcChannel::TempSensor => 0,
            AdcChannel::Vrefint => 1,
        }
    }
}
