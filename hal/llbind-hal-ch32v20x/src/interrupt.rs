//! PFIC helpers and interrupt forwarders
//!
//! The vector table belongs to the application. Its handlers call into
//! [`Interrupts`], which acknowledges the hardware and posts an [`Event`].

use llbind_hal::{Event, EventQueue, RegisterBus};

use crate::config::Config;
use crate::regs::{adc, pfic, systick, usart};

pub(crate) fn enable_irq<B: RegisterBus>(bus: &B, irq: u8) {
    let irq = u32::from(irq);
    bus.write(pfic::IENR + 4 * (irq / 32), 1 << (irq % 32));
}

pub(crate) fn disable_irq<B: RegisterBus>(bus: &B, irq: u8) {
    let irq = u32::from(irq);
    bus.write(pfic::IRER + 4 * (irq / 32), 1 << (irq % 32));
}

/// Priority byte: preemption in bits 7:6, sub-priority in bits 5:4
pub(crate) fn set_priority<B: RegisterBus>(bus: &B, irq: u8, preempt: u8, sub: u8) {
    let byte = (u32::from(preempt & 0b11) << 6) | (u32::from(sub & 0b11) << 4);
    set_priority_byte(bus, irq, byte);
}

pub(crate) fn set_priority_byte<B: RegisterBus>(bus: &B, irq: u8, byte: u32) {
    let irq = u32::from(irq);
    let shift = 8 * (irq % 4);
    bus.write_field(pfic::IPRIOR + 4 * (irq / 4), 0xFF << shift, byte & 0xFF);
}

/// Interrupt-side view of the chip
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

    fn post(&self, event: Event) {
        if !self.events.post(event) {
            warn!("event queue full, dropped {}", event);
        }
    }

    /// ADC1_2 handler body
    pub fn on_adc1_2(&self) {
        let bus = &self.bus;
        if !bus.is_set(adc::STATR, adc::STATR_EOC) || !bus.is_set(adc::CTLR1, adc::CTLR1_EOCIE) {
            return;
        }
        let value = (bus.read(adc::RDATAR) & 0xFFFF) as u16;
        bus.clear_bits(adc::STATR, adc::STATR_EOC);
        let hw = bus.read(adc::RSQR3) & adc::RSQR3_SQ1;
        self.post(Event::AdcSample {
            channel: crate::adc::logical_channel(hw),
            value,
        });
    }

    /// USARTn handler body
    pub fn on_usart(&self, id: u32) {
        let Ok(port) = self.config.usart.get(id) else {
            return;
        };
        let bus = &self.bus;
        if !bus.is_set(port.base + usart::STATR, usart::STATR_RXNE)
            || !bus.is_set(port.base + usart::CTLR1, usart::CTLR1_RXNEIE)
        {
            return;
        }
        let byte = (bus.read(port.base + usart::DATAR) & 0xFF) as u8;
        self.post(Event::UsartRx {
            usart: id as u8,
            byte,
        });
    }

    /// SysTick handler body
    pub fn on_systick(&self) {
        self.bus.write(systick::SR, 0);
        self.events.tick();
    }
}
