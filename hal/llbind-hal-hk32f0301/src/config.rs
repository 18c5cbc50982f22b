//! Peripheral tables and clock figures
//!
//! [`Config::default`] describes an HK32F0301MxxC running from its 32 MHz
//! internal oscillator.

use llbind_hal::{HalError, PeripheralTable};

use crate::gpio::parse_pin;

/// Interrupt numbers of the HK32F0301MxxC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Interrupt {
    Exti0 = 5,
    Exti1 = 6,
    Exti2 = 7,
    Exti3 = 8,
    Exti4 = 9,
    Exti5 = 10,
    Exti6 = 21,
    Exti7 = 22,
}

impl Interrupt {
    pub const fn number(self) -> u8 {
        self as u16 as u8
    }
}

// SAFETY: every variant is a valid interrupt number of this chip
#[cfg(feature = "cortex-m")]
unsafe impl cortex_m::interrupt::InterruptNumber for Interrupt {
    #[inline(always)]
    fn number(self) -> u16 {
        self as u16
    }
}

/// GPIO port with 8 pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPort {
    pub base: u32,
}

impl GpioPort {
    pub const PINS: u32 = 8;
}

/// EXTI line and the NVIC interrupt it raises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtiLine {
    pub irq: Interrupt,
}

/// Chip configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Core clock in Hz, drives SysTick
    pub system_core_clock: u32,
    /// Clock of UART1 in Hz
    pub pclk_hz: u32,
    pub gpio: PeripheralTable<GpioPort, 4>,
    /// Indexed by line number, which is also the pin number
    pub exti: PeripheralTable<ExtiLine, 8>,
    /// UART1 TX pin as `(port, pin, alternate function)`
    pub log_tx_pin: (u32, u32, u8),
    pub log_baudrate: u32,
}

impl Config {
    /// Route the log UART to a named pin such as `"PA3"`
    ///
    /// Unknown names leave the configuration unchanged.
    pub fn set_log_tx_pin(&mut self, name: &str, af: u8) -> Result<(), HalError> {
        let (port, pin) = parse_pin(name).ok_or(HalError::InvalidIndex)?;
        if af > 7 {
            return Err(HalError::InvalidArgument);
        }
        self.log_tx_pin = (port, pin, af);
        Ok(())
    }
}

const fn port(base: u32) -> Option<GpioPort> {
    Some(GpioPort { base })
}

const fn line(irq: Interrupt) -> Option<ExtiLine> {
    Some(ExtiLine { irq })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_core_clock: 32_000_000,
            pclk_hz: 32_000_000,
            gpio: PeripheralTable::new([
                port(0x5000_0000), // GPIOA
                port(0x5000_0400), // GPIOB
                port(0x5000_0800), // GPIOC
                port(0x5000_0C00), // GPIOD
            ]),
            exti: PeripheralTable::new([
                line(Interrupt::Exti0),
                line(Interrupt::Exti1),
                line(Interrupt::Exti2),
                line(Interrupt::Exti3),
                line(Interrupt::Exti4),
                line(Interrupt::Exti5),
                line(Interrupt::Exti6),
                line(Interrupt::Exti7),
            ]),
            log_tx_pin: (3, 2, 1), // PD2, AF1
            log_baudrate: 115_200,
        }
    }
}
