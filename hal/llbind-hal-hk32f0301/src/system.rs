//! Clocks, SysTick, delays and the log port

use llbind_hal::uart::UartConfig;
use llbind_hal::{GpioFlags, HalError, RegisterBus};

use crate::config::Config;
use crate::gpio;
use crate::regs::{rcc, scb, systick, uart};

/// SysTick interrupt rate
pub const TICK_HZ: u32 = 1000;

/// Longest single busy-wait, in nanoseconds
const DELAY_CHUNK_NS: u32 = 500_000;

/// Lowest of the four implemented levels
const SYSTICK_PRIORITY: u32 = 0xC0;

/// Vendor `SystemInit` runs from the reset handler before `main`; nothing
/// is left to do here.
pub fn system_init() {
    debug!("system_init: clocks already set by reset handler");
}

/// Peripheral clocks, SysTick and the log port
pub fn ll_drv_init<B: RegisterBus>(bus: &B, config: &Config) -> Result<(), HalError> {
    bus.set_bits(
        rcc::AHBENR,
        rcc::AHB_IOPA | rcc::AHB_IOPB | rcc::AHB_IOPC | rcc::AHB_IOPD,
    );
    bus.set_bits(rcc::APB2ENR, rcc::APB2_SYSCFG | rcc::APB2_UART1);
    bus.set_bits(rcc::APB1ENR, rcc::APB1_PWR);

    systick_init(bus, config.system_core_clock);
    log_port_init(bus, config)?;
    debug!("ll_drv_init done, core clock {}", config.system_core_clock);
    Ok(())
}

fn systick_init<B: RegisterBus>(bus: &B, core_clock: u32) {
    bus.write(systick::LOAD, core_clock / TICK_HZ - 1);
    bus.write_field(scb::SHPR3, 0xFF << 24, SYSTICK_PRIORITY);
    bus.write(systick::VAL, 0);
    bus.write(systick::CTRL, systick::CTRL_RUN);
}

/// UART1 transmit only, 8-N-1
fn log_port_init<B: RegisterBus>(bus: &B, config: &Config) -> Result<(), HalError> {
    let (port, pin, af) = config.log_tx_pin;
    let uart_config = UartConfig::with_baudrate(config.log_baudrate)?;
    gpio::init(bus, &config.gpio, port, pin, GpioFlags((u32::from(af) + 1) << 4))?;

    bus.write(uart::CR1, 0);
    bus.write(uart::BRR, uart_config.divider(config.pclk_hz));
    bus.write(uart::CR1, uart::CR1_TE);
    bus.set_bits(uart::CR1, uart::CR1_UE);
    Ok(())
}

/// Busy-wait for at least `ns` nanoseconds on the SysTick counter
///
/// Returns at once if SysTick is not running.
pub fn delay_nanos<B: RegisterBus>(bus: &B, core_clock: u32, ns: u32) {
    let load = bus.read(systick::LOAD);
    if load == 0 {
        return;
    }
    let period = load + 1;
    let ticks_per_us = u64::from(core_clock / 1_000_000);

    let mut remaining = ns;
    while remaining > 0 {
        let chunk = remaining.min(DELAY_CHUNK_NS);
        remaining -= chunk;
        let ticks = (u64::from(chunk) * ticks_per_us / 1000) as u32;
        wait_ticks(bus, period, ticks);
    }
}

/// Count `ticks` counter decrements, tolerating reload at `period`
fn wait_ticks<B: RegisterBus>(bus: &B, period: u32, ticks: u32) {
    let mut last = bus.read(systick::VAL);
    let mut elapsed = 0u32;
    while elapsed < ticks {
        let now = bus.read(systick::VAL);
        elapsed += if now <= last {
            last - now
        } else {
            last + period - now
        };
        last = now;
    }
}

/// Blocking write to the log port
pub fn log_puts<B: RegisterBus>(bus: &B, data: &[u8]) {
    for &byte in data {
        bus.write(uart::TDR, u32::from(byte));
        while !bus.is_set(uart::ISR, uart::ISR_TXE) {}
    }
}
