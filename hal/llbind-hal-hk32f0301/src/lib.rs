//! HK32F0301MxxC driver for the llbind command set
//!
//! [`Hk32f0301`] owns a [`RegisterBus`] and a [`Config`] and implements
//! [`Invoke`] for the commands this part supports:
//!
//! - `SystemInit`, `LlDrvInit`, `DelayNanos`, `LogPuts`
//! - every GPIO command, including `GpioExti`
//!
//! Everything else answers [`HalError::UnknownCommand`] without touching
//! the hardware.
//!
//! # Interrupts
//!
//! The `EXTIn` and `SysTick` vectors call into [`interrupt::Interrupts`].
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting and logging
//! - `cortex-m` - Implement `cortex_m::interrupt::InterruptNumber` for
//!   [`config::Interrupt`]
//!
//! # Usage
//!
//! ```ignore
//! use llbind_hal::{Command, ExtiFlag, Invoke, Mmio};
//! use llbind_hal_hk32f0301::{Config, Hk32f0301};
//!
//! let mut config = Config::default();
//! config.set_log_tx_pin("PA3", 1)?;
//! let mut chip = Hk32f0301::new(unsafe { Mmio::new() }, config);
//! chip.invoke(Command::LlDrvInit)?;
//! chip.invoke(Command::GpioExti { port: 0, pin: 4, flag: ExtiFlag::Falling })?;
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod gpio;
pub mod interrupt;
pub mod regs;
pub mod system;

pub use config::Config;

use embedded_hal::delay::DelayNs;
use llbind_hal::{Command, HalError, Invoke, RegisterBus, Response};

/// HK32F0301 chip driver
pub struct Hk32f0301<B: RegisterBus> {
    bus: B,
    config: Config,
}

impl<B: RegisterBus> Hk32f0301<B> {
    pub fn new(bus: B, config: Config) -> Self {
        Self { bus, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: RegisterBus> Invoke for Hk32f0301<B> {
    fn invoke(&mut self, cmd: Command<'_>) -> Result<Response, HalError> {
        trace!("invoke {}", cmd.id());
        let bus = &self.bus;
        let config = &self.config;

        match cmd {
            Command::SystemInit => system::system_init(),
            Command::LlDrvInit => system::ll_drv_init(bus, config)?,
            Command::DelayNanos(ns) => system::delay_nanos(bus, config.system_core_clock, ns),
            Command::LogPuts(data) => system::log_puts(bus, data),

            Command::GpioInit { port, pin, flags } => {
                gpio::init(bus, &config.gpio, port, pin, flags)?
            }
            Command::GpioSet { port, pin, level } => {
                gpio::set(bus, &config.gpio, port, pin, level)?
            }
            Command::GpioGetInput { port, pin } => {
                return gpio::get_input(bus, &config.gpio, port, pin).map(Response::Level)
            }
            Command::GpioGetOutput { port, pin } => {
                return gpio::get_output(bus, &config.gpio, port, pin).map(Response::Level)
            }
            Command::GpioGetPortReg { port } => {
                return gpio::port_reg(&config.gpio, port).map(Response::PortReg)
            }
            Command::GpioExti { port, pin, flag } => gpio::exti(bus, config, port, pin, flag)?,

            other => {
                debug!("{} not supported", other.id());
                return Err(HalError::UnknownCommand);
            }
        }
        Ok(Response::Done)
    }
}

impl<B: RegisterBus> DelayNs for Hk32f0301<B> {
    fn delay_ns(&mut self, ns: u32) {
        system::delay_nanos(&self.bus, self.config.system_core_clock, ns);
    }
}
