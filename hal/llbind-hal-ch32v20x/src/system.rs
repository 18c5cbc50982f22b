//! Clocks, SysTick, delays and the log port

use llbind_hal::uart::UsartFlags;
use llbind_hal::{GpioFlags, HalError, RegisterBus};

use crate::config::Config;
use crate::interrupt::{enable_irq, set_priority_byte};
use crate::regs::{pfic, rcc, systick, usart as usart_regs};
use crate::{gpio, usart};

/// SysTick interrupt rate
pub const TICK_HZ: u32 = 1000;

/// Longest single busy-wait, in nanoseconds
const DELAY_CHUNK_NS: u32 = 500_000;

const LOG_BAUDRATE: u32 = 115_200;

/// Lowest priority: preemption 3, sub-priority 3
const SYSTICK_PRIORITY: u32 = 0xF0;

/// Peripheral clocks, ADC prescaler, SysTick, sleep behaviour and log port
pub fn ll_drv_init<B: RegisterBus>(bus: &B, config: &Config) -> Result<(), HalError> {
    bus.set_bits(
        rcc::APB2PCENR,
        rcc::APB2_IOPA
            | rcc::APB2_IOPB
            | rcc::APB2_IOPC
            | rcc::APB2_IOPD
            | rcc::APB2_IOPE
            | rcc::APB2_AFIO
            | rcc::APB2_SPI1
            | rcc::APB2_USART1
            | rcc::APB2_ADC1
            | rcc::APB2_TIM1,
    );
    bus.set_bits(rcc::APB1PCENR, rcc::APB1_USART2 | rcc::APB1_USART3);
    bus.set_bits(rcc::AHBPCENR, rcc::AHB_DMA1);
    bus.write_field(rcc::CFGR0, rcc::CFGR0_ADCPRE, rcc::ADCPRE_DIV8);

    systick_init(bus, config.system_core_clock);
    bus.set_bits(pfic::SCTLR, pfic::SCTLR_SEVONPEND | pfic::SCTLR_WFITOWFE);

    if let Some((port, pin)) = config.log_tx_pin {
        gpio::init(bus, &config.gpio, port, pin, GpioFlags::AF_PP)?;
    }
    usart::init(
        bus,
        config,
        config.log_usart,
        UsartFlags(0),
        LOG_BAUDRATE,
    )?;
    debug!("ll_drv_init done, core clock {}", config.system_core_clock);
    Ok(())
}

fn systick_init<B: RegisterBus>(bus: &B, core_clock: u32) {
    bus.write(systick::CTLR, 0);
    bus.write(systick::SR, 0);
    bus.write(systick::CNTL, 0);
    bus.write(systick::CNTH, 0);
    bus.write(systick::CMPL, core_clock / TICK_HZ - 1);
    bus.write(systick::CMPH, 0);
    set_priority_byte(bus, systick::IRQ, SYSTICK_PRIORITY);
    bus.set_bits(systick::CTLR, systick::CTLR_RUN);
    enable_irq(bus, systick::IRQ);
}

/// Busy-wait for at least `ns` nanoseconds on the SysTick counter
///
/// Returns at once if SysTick is not running.
pub fn delay_nanos<B: RegisterBus>(bus: &B, core_clock: u32, ns: u32) {
    let period = bus.read(systick::CMPL).wrapping_add(1);
    if period <= 1 {
        return;
    }
    let ticks_per_us = u64::from(core_clock / 1_000_000);

    let mut remaining = ns;
    while remaining > 0 {
        let chunk = remaining.min(DELAY_CHUNK_NS);
        remaining -= chunk;
        let ticks = (u64::from(chunk) * ticks_per_us / 1000) as u32;
        wait_ticks(bus, period, ticks);
    }
}

/// Count `ticks` counter increments, tolerating wrap at `period`
fn wait_ticks<B: RegisterBus>(bus: &B, period: u32, ticks: u32) {
    let mut last = bus.read(systick::CNTL);
    let mut elapsed = 0u32;
    while elapsed < ticks {
        let now = bus.read(systick::CNTL);
        elapsed += if now >= last {
            now - last
        } else {
            period - last + now
        };
        last = now;
    }
}

/// Blocking write to the log port, waiting for transmission complete
pub fn log_puts<B: RegisterBus>(bus: &B, config: &Config, data: &[u8]) -> Result<(), HalError> {
    let port = config.usart.get(config.log_usart)?;
    for &byte in data {
        bus.write(port.base + usart_regs::DATAR, u32::from(byte));
        while !bus.is_set(port.base + usart_regs::STATR, usart_regs::STATR_TC) {}
    }
    Ok(())
}
