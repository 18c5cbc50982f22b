//! WCH CH32V20x driver for the llbind command set
//!
//! [`Ch32v20x`] owns a [`RegisterBus`], a [`Config`] describing which
//! peripheral sits behind each logical index, and an [`I2cBackend`]. It
//! implements [`Invoke`] by routing every [`Command`] to the matching
//! shim module.
//!
//! # Supported commands
//!
//! All of them except `GpioExti`, which this family does not wire up and
//! answers with [`HalError::UnknownCommand`].
//!
//! # Interrupts
//!
//! The application's vector table calls the methods of
//! [`interrupt::Interrupts`] from `ADC1_2`, `USARTn` and `SysTick`; they
//! report through an [`EventQueue`](llbind_hal::EventQueue).
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting and logging
//!
//! # Usage
//!
//! ```ignore
//! use llbind_hal::{Command, Invoke, Mmio, NoI2c};
//! use llbind_hal_ch32v20x::{Ch32v20x, Config};
//!
//! let bus = unsafe { Mmio::new() };
//! let mut chip = Ch32v20x::new(bus, Config::default(), NoI2c);
//! chip.invoke(Command::LlDrvInit)?;
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod adc;
pub mod config;
pub mod dma;
pub mod gpio;
pub mod interrupt;
pub mod pwm;
pub mod regs;
pub mod spi;
pub mod system;
pub mod usart;

pub use config::Config;

use embedded_hal::delay::DelayNs;
use llbind_hal::{Command, HalError, I2cBackend, Invoke, RegisterBus, Response};

/// CH32V20x chip driver
pub struct Ch32v20x<B: RegisterBus, I: I2cBackend> {
    bus: B,
    config: Config,
    i2c: I,
}

impl<B: RegisterBus, I: I2cBackend> Ch32v20x<B, I> {
    pub fn new(bus: B, config: Config, i2c: I) -> Self {
        Self { bus, config, i2c }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Give back the bus and the I2C backend
    pub fn release(self) -> (B, I) {
        (self.bus, self.i2c)
    }
}

impl<B: RegisterBus, I: I2cBackend> Invoke for Ch32v20x<B, I> {
    fn invoke(&mut self, cmd: Command<'_>) -> Result<Response, HalError> {
        trace!("invoke {}", cmd.id());
        let bus = &self.bus;
        let config = &self.config;

        match cmd {
            Command::SystemInit => {}
            Command::LlDrvInit => system::ll_drv_init(bus, config)?,
            Command::DelayNanos(ns) => system::delay_nanos(bus, config.system_core_clock, ns),
            Command::LogPuts(data) => system::log_puts(bus, config, data)?,

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
            Command::GpioExti { .. } => return Err(HalError::UnknownCommand),

            Command::SpiInit {
                bus: id,
                mode,
                flags,
                baudrate,
            } => spi::init(bus, config, id, mode, flags, baudrate)?,
            Command::SpiDeinit { bus: id } => spi::deinit(bus, &config.spi, id)?,
            Command::SpiTransfer {
                bus: id,
                write,
                read,
            } => spi::transfer(bus, &config.spi, id, write, read)?,

            Command::UsartInit {
                usart: id,
                flags,
                baudrate,
            } => usart::init(bus, config, id, flags, baudrate)?,
            Command::UsartDeinit { usart: id } => usart::deinit(bus, &config.usart, id)?,
            Command::UsartWrite { usart: id, data } => {
                usart::write(bus, &config.usart, id, data)?
            }

            Command::PwmInit { channel, freq_hz } => {
                pwm::init(bus, config.system_core_clock, channel, freq_hz)?
            }
            Command::PwmDeinit { channel } => pwm::deinit(bus, channel)?,
            Command::PwmCtrl { channel, ctrl } => return pwm::ctrl(bus, channel, ctrl),

            Command::AdcInit { channel, flags } => adc::init(bus, channel, flags)?,
            Command::AdcDeinit { channel } => adc::deinit(bus, channel)?,
            Command::AdcCtrl { channel, ctrl } => adc::ctrl(bus, channel, ctrl)?,

            Command::DmaInit {
                channel,
                src,
                dst,
                flags,
                extra_flags: _,
            } => dma::init(bus, &config.dma, channel, src, dst, flags)?,
            Command::DmaDeinit { channel } => dma::deinit(bus, &config.dma, channel)?,
            Command::DmaCtrl { channel, ctrl } => dma::ctrl(bus, &config.dma, channel, ctrl)?,

            // Single implicit bus; the backend owns addressing
            Command::I2cInit { config, flags, .. } => self.i2c.init(config, flags)?,
            Command::I2cRead { address, buf, .. } => self.i2c.read(address, buf)?,
            Command::I2cWrite { address, data, .. } => self.i2c.write(address, data)?,
            Command::I2cWriteRead {
                address, data, buf, ..
            } => self.i2c.write_read(address, data, buf)?,
        }
        Ok(Response::Done)
    }
}

impl<B: RegisterBus, I: I2cBackend> DelayNs for Ch32v20x<B, I> {
    fn delay_ns(&mut self, ns: u32) {
        system::delay_nanos(&self.bus, self.config.system_core_clock, ns);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::gpio as gpio_regs;
    use crate::testutil::sim_bus;
    use llbind_hal::dma::{DmaCtrl, DmaEndpoint, DmaFlags};
    use llbind_hal::pwm::PwmCtrl;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, Operation};
    use llbind_hal::i2c::I2cConfig;
    use llbind_hal::{EmbeddedHalI2c, ExtiFlag, GpioFlags, I2cError, InvokeId, NoI2c};
    use llbind_sim::SimBus;
    use proptest::prelude::*;

    const PA: u32 = 0x4001_0800;

    fn chip(bus: &SimBus) -> Ch32v20x<&SimBus, NoI2c> {
        Ch32v20x::new(bus, Config::default(), NoI2c)
    }

    #[test]
    fn test_gpio_end_to_end() {
        let bus = sim_bus();
        let mut chip = chip(&bus);
        let init = Command::GpioInit {
            port: 0,
            pin: 5,
            flags: GpioFlags::OUT_PP,
        };
        assert_eq!(chip.invoke_code(init), 0);
        assert_eq!(
            chip.invoke_code(Command::GpioSet {
                port: 0,
                pin: 5,
                level: true
            }),
            0
        );
        assert_eq!(bus.peek(PA + gpio_regs::OUTDR) & (1 << 5), 1 << 5);
        assert_eq!(
            chip.invoke_code(Command::GpioGetOutput { port: 0, pin: 5 }),
            1
        );
    }

    #[test]
    fn test_unsupported_command_has_no_effect() {
        let bus = sim_bus();
        let mut chip = chip(&bus);
        let code = chip.invoke_code(Command::GpioExti {
            port: 0,
            pin: 0,
            flag: ExtiFlag::Rising,
        });
        assert_eq!(code, -1000);
        assert!(bus.accesses().is_empty());
    }

    #[test]
    fn test_unknown_numeric_id() {
        assert_eq!(
            InvokeId::try_from(4242).map_err(|e| e.code()),
            Err(-1000)
        );
    }

    #[test]
    fn test_dma_wait_on_idle_channel() {
        let bus = sim_bus();
        let mut chip = chip(&bus);
        let code = chip.invoke_code(Command::DmaCtrl {
            channel: 3,
            ctrl: DmaCtrl::Wait,
        });
        assert_eq!(code, 0);
    }

    #[test]
    fn test_dma_buffer_reconciliation() {
        let flags =
            DmaFlags(DmaFlags::SRC_HALFWORD | DmaFlags::DST_HALFWORD | DmaFlags::PERIPH_TO_MEM);
        let cntr = 0x4002_0008 + crate::regs::dma::CNTR;
        let cases = [((0, 32), Ok(32)), ((10, 7), Ok(7)), ((0, 0), Err(-5))];
        for ((src_size, dst_size), expect) in cases {
            let bus = sim_bus();
            let mut chip = chip(&bus);
            let code = chip.invoke_code(Command::DmaInit {
                channel: 0,
                src: DmaEndpoint::new(0x4001_244C, src_size),
                dst: DmaEndpoint::new(0x2000_0000, dst_size),
                flags,
                extra_flags: 0,
            });
            match expect {
                Ok(count) => {
                    assert_eq!(code, 0);
                    assert_eq!(bus.peek(cntr), count);
                }
                Err(err) => {
                    assert_eq!(code, err);
                    assert!(bus.accesses().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_pwm_values_come_back() {
        let bus = sim_bus();
        let mut chip = chip(&bus);
        chip.invoke(Command::PwmInit {
            channel: 0,
            freq_hz: 1_000_000,
        })
        .unwrap();
        chip.invoke(Command::PwmCtrl {
            channel: 0,
            ctrl: PwmCtrl::SetDuty(250),
        })
        .unwrap();
        assert_eq!(
            chip.invoke_code(Command::PwmCtrl {
                channel: 0,
                ctrl: PwmCtrl::GetDuty
            }),
            250
        );
        assert_eq!(
            chip.invoke_code(Command::PwmCtrl {
                channel: 1,
                ctrl: PwmCtrl::On
            }),
            -1
        );
    }

    #[test]
    fn test_i2c_without_backend() {
        let bus = sim_bus();
        let mut chip = chip(&bus);
        assert_eq!(
            chip.invoke_code(Command::I2cInit {
                bus: 0,
                config: Default::default(),
                flags: 0
            }),
            0
        );
        let mut buf = [0u8; 2];
        let result = chip.invoke(Command::I2cRead {
            bus: 0,
            addr_bits: 7,
            address: 0x50,
            buf: &mut buf,
        });
        assert_eq!(result, Err(HalError::I2c(I2cError::NoBackend)));
        assert_eq!(
            chip.invoke_code(Command::I2cWrite {
                bus: 0,
                addr_bits: 7,
                address: 0x50,
                data: &[1],
            }),
            -1
        );
        assert!(bus.accesses().is_empty());
    }

    /// 256-byte register device at 0x50 with an auto-incrementing pointer
    struct Eeprom {
        mem: [u8; 256],
        ptr: u8,
    }

    impl Eeprom {
        fn new() -> Self {
            Self {
                mem: [0; 256],
                ptr: 0,
            }
        }
    }

    impl embedded_hal::i2c::ErrorType for Eeprom {
        type Error = ErrorKind;
    }

    impl embedded_hal::i2c::I2c for Eeprom {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != 0x50 {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(data) => {
                        if let Some((&ptr, rest)) = data.split_first() {
                            self.ptr = ptr;
                            for &b in rest {
                                self.mem[usize::from(self.ptr)] = b;
                                self.ptr = self.ptr.wrapping_add(1);
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.mem[usize::from(self.ptr)];
                            self.ptr = self.ptr.wrapping_add(1);
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_i2c_through_backend() {
        let bus = sim_bus();
        let mut chip = Ch32v20x::new(&bus, Config::default(), EmbeddedHalI2c::new(Eeprom::new()));
        assert_eq!(
            chip.invoke_code(Command::I2cInit {
                bus: 1,
                config: I2cConfig::FAST,
                flags: 0
            }),
            0
        );
        assert_eq!(
            chip.invoke_code(Command::I2cWrite {
                bus: 1,
                addr_bits: 7,
                address: 0x50,
                data: &[0x10, 0xAB, 0xCD],
            }),
            0
        );

        let mut buf = [0u8; 2];
        let code = chip.invoke_code(Command::I2cWriteRead {
            bus: 1,
            addr_bits: 7,
            address: 0x50,
            data: &[0x10],
            buf: &mut buf,
        });
        assert_eq!(code, 0);
        assert_eq!(buf, [0xAB, 0xCD]);

        chip.invoke(Command::I2cWrite {
            bus: 1,
            addr_bits: 7,
            address: 0x50,
            data: &[0x11],
        })
        .unwrap();
        let mut one = [0u8; 1];
        let code = chip.invoke_code(Command::I2cRead {
            bus: 1,
            addr_bits: 7,
            address: 0x50,
            buf: &mut one,
        });
        assert_eq!(code, 0);
        assert_eq!(one, [0xCD]);

        // Missing device
        assert_eq!(
            chip.invoke(Command::I2cWrite {
                bus: 1,
                addr_bits: 7,
                address: 0x51,
                data: &[0],
            }),
            Err(HalError::I2c(I2cError::Bus(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address
            ))))
        );

        assert!(bus.accesses().is_empty());
        let (_, i2c) = chip.release();
        assert_eq!(i2c.config(), I2cConfig::FAST);
    }

    #[test]
    fn test_port_reg_response() {
        let bus = sim_bus();
        let mut chip = chip(&bus);
        match chip.invoke(Command::GpioGetPortReg { port: 2 }) {
            Ok(Response::PortReg(regs)) => assert_eq!(regs.odr as usize, 0x4001_100C),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(chip.invoke_code(Command::GpioGetPortReg { port: 7 }), -1);
    }

    #[test]
    fn test_delay_ns_trait() {
        let bus = sim_bus();
        bus.poke(crate::regs::systick::CMPL, 143_999);
        let mut chip = chip(&bus);
        chip.delay_us(100);
        assert!(bus.touched(crate::regs::systick::CNTL, crate::regs::systick::CNTL + 4));
    }

    proptest! {
        #[test]
        fn test_gpio_index_resolves_own_port(port in 0u32..7, pin in 0u32..16) {
            let bus = sim_bus();
            let mut chip = chip(&bus);
            let code = chip.invoke_code(Command::GpioSet { port, pin, level: true });
            prop_assert_eq!(code, 0);
            let base = 0x4001_0800 + 0x400 * port;
            for a in bus.accesses() {
                prop_assert!(a.addr() >= base && a.addr() < base + 0x400);
            }
            prop_assert_eq!(bus.peek(base + gpio_regs::OUTDR), 1 << pin);
        }

        #[test]
        fn test_out_of_range_touches_nothing(port in 7u32..1000, pin in 0u32..1000, channel in 9u32..1000) {
            let bus = sim_bus();
            let mut chip = chip(&bus);
            prop_assert_eq!(chip.invoke_code(Command::GpioSet { port, pin, level: true }), -1);
            prop_assert_eq!(chip.invoke_code(Command::GpioGetInput { port, pin }), -1);
            prop_assert_eq!(chip.invoke_code(Command::DmaCtrl { channel, ctrl: DmaCtrl::Start }), -1);
            prop_assert_eq!(chip.invoke_code(Command::UsartWrite { usart: channel, data: b"x" }), -1);
            prop_assert_eq!(chip.invoke_code(Command::SpiDeinit { bus: channel }), -1);
            prop_assert_eq!(chip.invoke_code(Command::AdcDeinit { channel }), -1);
            prop_assert!(bus.accesses().is_empty());
        }
    }
}
