//! Peripheral tables and clock figures
//!
//! [`Config::default`] describes a CH32V203/V208 running from its 144 MHz
//! PLL. Boards with other clocks, or tests that want their own addresses,
//! build a `Config` by hand or patch the default.

use llbind_hal::PeripheralTable;

/// Peripheral bus a block hangs off, selects its clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Apb {
    Apb1,
    Apb2,
}

/// GPIO port with 16 pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPort {
    pub base: u32,
}

impl GpioPort {
    pub const PINS: u32 = 16;
}

/// SPI bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiBus {
    pub base: u32,
    pub apb: Apb,
}

/// USART port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsartPort {
    pub base: u32,
    pub apb: Apb,
    /// Interrupt line; when present `UsartInit` enables the RX interrupt
    pub rx_irq: Option<u8>,
}

/// DMA1 channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaChannel {
    /// Address of the channel's CFGR
    pub base: u32,
    /// Transfer-complete bit in INTFR / INTFCR
    pub tc_mask: u32,
}

impl DmaChannel {
    /// Channel `n` of DMA1, counting from 1
    pub const fn dma1(n: u32) -> Self {
        let base = if n == 8 {
            crate::regs::dma::BASE + 0x94
        } else {
            crate::regs::dma::BASE + 0x08 + 20 * (n - 1)
        };
        Self {
            base,
            tc_mask: 1 << (1 + 4 * (n - 1)),
        }
    }

    /// Every flag of the channel (global, TC, HT, TE)
    pub const fn all_flags(&self) -> u32 {
        0xF << (self.tc_mask.trailing_zeros() - 1)
    }
}

/// Chip configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Core clock in Hz, drives SysTick and TIM1
    pub system_core_clock: u32,
    /// APB1 clock in Hz
    pub pclk1_hz: u32,
    /// APB2 clock in Hz
    pub pclk2_hz: u32,
    pub gpio: PeripheralTable<GpioPort, 7>,
    /// Slot 0 is empty; buses are numbered from 1
    pub spi: PeripheralTable<SpiBus, 3>,
    /// Slot 0 is empty; ports are numbered from 1
    pub usart: PeripheralTable<UsartPort, 5>,
    /// Logical channels 0..=7 are DMA1 channels 1..=8; 8 aliases channel 8
    pub dma: PeripheralTable<DmaChannel, 9>,
    /// USART used by `LogPuts`
    pub log_usart: u32,
    /// TX pin of the log USART as `(port, pin)`, set to AF push-pull by
    /// `LlDrvInit`
    pub log_tx_pin: Option<(u32, u32)>,
}

impl Config {
    /// Clock of the bus a block hangs off
    pub fn pclk(&self, apb: Apb) -> u32 {
        match apb {
            Apb::Apb1 => self.pclk1_hz,
            Apb::Apb2 => self.pclk2_hz,
        }
    }
}

const fn port(base: u32) -> Option<GpioPort> {
    Some(GpioPort { base })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_core_clock: 144_000_000,
            pclk1_hz: 144_000_000,
            pclk2_hz: 144_000_000,
            gpio: PeripheralTable::new([
                port(0x4001_0800), // GPIOA
                port(0x4001_0C00), // GPIOB
                port(0x4001_1000), // GPIOC
                port(0x4001_1400), // GPIOD
                port(0x4001_1800), // GPIOE
                port(0x4001_1C00), // GPIOF
                port(0x4001_2000), // GPIOG
            ]),
            spi: PeripheralTable::new([
                None,
                Some(SpiBus {
                    base: 0x4001_3000,
                    apb: Apb::Apb2,
                }),
                Some(SpiBus {
                    base: 0x4000_3800,
                    apb: Apb::Apb1,
                }),
            ]),
            usart: PeripheralTable::new([
                None,
                Some(UsartPort {
                    base: 0x4001_3800,
                    apb: Apb::Apb2,
                    rx_irq: None,
                }),
                Some(UsartPort {
                    base: 0x4000_4400,
                    apb: Apb::Apb1,
                    rx_irq: Some(crate::regs::pfic::IRQ_USART2),
                }),
                Some(UsartPort {
                    base: 0x4000_4800,
                    apb: Apb::Apb1,
                    rx_irq: None,
                }),
                Some(UsartPort {
                    base: 0x4000_4C00,
                    apb: Apb::Apb1,
                    rx_irq: None,
                }),
            ]),
            dma: PeripheralTable::new([
                Some(DmaChannel::dma1(1)),
                Some(DmaChannel::dma1(2)),
                Some(DmaChannel::dma1(3)),
                Some(DmaChannel::dma1(4)),
                Some(DmaChannel::dma1(5)),
                Some(DmaChannel::dma1(6)),
                Some(DmaChannel::dma1(7)),
                Some(DmaChannel::dma1(8)),
                Some(DmaChannel::dma1(8)),
            ]),
            log_usart: 1,
            log_tx_pin: Some((0, 9)), // PA9
        }
    }
}
