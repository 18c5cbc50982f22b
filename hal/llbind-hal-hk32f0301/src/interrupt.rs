//! NVIC helpers and interrupt forwarders

use llbind_hal::{Event, EventQueue, RegisterBus};

use crate::config::Config;
use crate::regs::{exti, nvic};

pub(crate) fn enable_irq<B: RegisterBus>(bus: &B, irq: u8) {
    bus.write(nvic::ISER, 1 << (irq % 32));
}

pub(crate) fn disable_irq<B: RegisterBus>(bus: &B, irq: u8) {
    bus.write(nvic::ICER, 1 << (irq % 32));
}

/// Priority level in the implemented top bits of the IPR byte
pub(crate) fn set_priority<B: RegisterBus>(bus: &B, irq: u8, level: u8) {
    let irq = u32::from(irq);
    let byte = (u32::from(level) << (8 - nvic::PRIO_BITS)) & 0xFF;
    let shift = 8 * (irq % 4);
    bus.write_field(nvic::IPR + 4 * (irq / 4), 0xFF << shift, byte);
}

/// Interrupt-side view of the chip
///
/// `EXTIn` handlers call [`Interrupts::on_exti`] and `SysTick` calls
/// [`Interrupts::on_systick`].
pub struct Interrupts<'a, B: RegisterBus> {
    bus: B,
    config: &'a Config,
    events: &'a EventQueue,
}

impl<'a, B: RegisterBus> Interrupts<'a, B> {
    pub fn new(bus: B, config: &'a Config, events: &'a EventQueue) -> Self {
        Self {
            bus,
            config,
            events,
        }
    }

    /// EXTI handler body for one line. Returns true if the line was pending.
    pub fn on_exti(&self, line: u32) -> bool {
        if self.config.exti.get(line).is_err() {
            return false;
        }
        let mask = 1 << line;
        if !self.bus.is_set(exti::PR, mask) {
            return false;
        }
        self.bus.write(exti::PR, mask);
        let event = Event::Exti { line: line as u8 };
        if !self.events.post(event) {
            warn!("event queue full, dropped {}", event);
        }
        true
    }

    /// SysTick handler body
    pub fn on_systick(&self) -> u32 {
        self.events.tick()
    }
}
