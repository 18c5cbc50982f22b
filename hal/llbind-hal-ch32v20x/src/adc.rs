//! ADC1 shim
//!
//! Only the internal channels are exposed: logical channel 0 is the
//! temperature sensor, 1 is Vrefint. Single conversions busy-wait on EOC;
//! continuous mode delivers samples through the ADC1_2 interrupt.
//!
//! Calibration waits have no timeout. A dead ADC hangs the caller.

use llbind_hal::adc::{AdcChannel, AdcCtrl};
use llbind_hal::{HalError, RegisterBus};

use crate::interrupt::{disable_irq, enable_irq, set_priority};
use crate::regs::adc::*;
use crate::regs::pfic::IRQ_ADC1_2;

const IRQ_PREEMPT: u8 = 2;
const IRQ_SUB: u8 = 0;

fn hw_channel(channel: AdcChannel) -> u32 {
    match channel {
        AdcChannel::TempSensor => CHANNEL_TEMP_SENSOR,
        AdcChannel::Vrefint => CHANNEL_VREFINT,
    }
}

/// Logical channel of a hardware channel, as reported in events
pub(crate) fn logical_channel(hw: u32) -> u8 {
    match hw {
        CHANNEL_TEMP_SENSOR => AdcChannel::TempSensor.index(),
        CHANNEL_VREFINT => AdcChannel::Vrefint.index(),
        other => other as u8,
    }
}

/// Independent mode, no scan, software trigger, right aligned, one channel
fn configure<B: RegisterBus>(bus: &B, continuous: bool) {
    bus.clear_bits(CTLR1, CTLR1_DUALMOD | CTLR1_SCAN);
    bus.modify(CTLR2, |v| {
        let v = v & !(CTLR2_CONT | CTLR2_ALIGN | CTLR2_EXTSEL);
        let v = v | CTLR2_EXTSEL;
        if continuous {
            v | CTLR2_CONT
        } else {
            v
        }
    });
    bus.write_field(RSQR1, RSQR1_L, 0);
}

fn calibrate<B: RegisterBus>(bus: &B) {
    bus.clear_bits(CTLR1, CTLR1_BUFEN);
    bus.set_bits(CTLR2, CTLR2_RSTCAL);
    while bus.is_set(CTLR2, CTLR2_RSTCAL) {}
    bus.set_bits(CTLR2, CTLR2_CAL);
    while bus.is_set(CTLR2, CTLR2_CAL) {}
    bus.set_bits(CTLR1, CTLR1_BUFEN);
}

fn select<B: RegisterBus>(bus: &B, hw: u32, sample_time: u32) {
    // Channels 10..17 live in SAMPTR1, 0..9 in SAMPTR2
    let (reg, shift) = if hw >= 10 {
        (SAMPTR1, (hw - 10) * 3)
    } else {
        (SAMPTR2, hw * 3)
    };
    bus.write_field(reg, 0b111 << shift, sample_time);
    bus.write_field(RSQR3, RSQR3_SQ1, hw);
}

/// Single-conversion setup with calibration and the internal channels on
pub fn init<B: RegisterBus>(bus: &B, channel: u32, _flags: u32) -> Result<(), HalError> {
    AdcChannel::from_index(channel)?;

    configure(bus, false);
    bus.set_bits(CTLR2, CTLR2_ADON);
    calibrate(bus);
    bus.set_bits(CTLR2, CTLR2_TSVREFE);
    Ok(())
}

/// One blocking conversion of a hardware channel
pub fn convert_one<B: RegisterBus>(bus: &B, hw: u32) -> u16 {
    select(bus, hw, SAMPLE_239_5);
    bus.set_bits(CTLR2, CTLR2_EXTTRIG | CTLR2_SWSTART);
    while !bus.is_set(STATR, STATR_EOC) {}
    (bus.read(RDATAR) & 0xFFFF) as u16
}

fn start<B: RegisterBus>(bus: &B, hw: u32) {
    configure(bus, true);
    select(bus, hw, SAMPLE_13_5);
    bus.set_bits(CTLR1, CTLR1_EOCIE);
    bus.set_bits(CTLR2, CTLR2_ADON);
    calibrate(bus);
    bus.set_bits(CTLR2, CTLR2_TSVREFE);

    set_priority(bus, IRQ_ADC1_2, IRQ_PREEMPT, IRQ_SUB);
    enable_irq(bus, IRQ_ADC1_2);
    bus.set_bits(CTLR2, CTLR2_EXTTRIG | CTLR2_SWSTART);
}

fn stop<B: RegisterBus>(bus: &B) {
    bus.clear_bits(CTLR2, CTLR2_ADON | CTLR2_CONT);
    bus.clear_bits(CTLR1, CTLR1_EOCIE);
    disable_irq(bus, IRQ_ADC1_2);
}

/// Start, stop or convert on a logical channel
pub fn ctrl<B: RegisterBus>(bus: &B, channel: u32, ctrl: AdcCtrl<'_>) -> Result<(), HalError> {
    let hw = hw_channel(AdcChannel::from_index(channel)?);
    match ctrl {
        AdcCtrl::Convert(buf) => {
            for slot in buf.iter_mut() {
                *slot = convert_one(bus, hw);
            }
        }
        AdcCtrl::Start => start(bus, hw),
        AdcCtrl::Stop => stop(bus),
    }
    Ok(())
}

/// Turn the ADC and its interrupt off
pub fn deinit<B: RegisterBus>(bus: &B, channel: u32) -> Result<(), HalError> {
    AdcChannel::from_index(channel)?;
    stop(bus);
    bus.clear_bits(CTLR2, CTLR2_TSVREFE);
    Ok(())
}
