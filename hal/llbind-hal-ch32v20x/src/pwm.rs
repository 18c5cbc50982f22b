//! PWM on TIM1 channel 1
//!
//! Logical channel 0 is the only one. The timer runs edge-aligned, up
//! counting, in PWM mode 1 with a period of
//! [`DEFAULT_PERIOD_TICKS`](llbind_hal::pwm::DEFAULT_PERIOD_TICKS) after
//! init.

use llbind_hal::pwm::{prescaler_for, PwmCtrl, DEFAULT_PERIOD_TICKS};
use llbind_hal::{HalError, RegisterBus, Response};

use crate::regs::tim1::*;

fn check_channel(channel: u32) -> Result<(), HalError> {
    if channel != 0 {
        return Err(HalError::InvalidIndex);
    }
    Ok(())
}

/// Start TIM1 at `freq_hz` timer ticks per second with the output disabled
pub fn init<B: RegisterBus>(
    bus: &B,
    core_clock: u32,
    channel: u32,
    freq_hz: u32,
) -> Result<(), HalError> {
    check_channel(channel)?;
    let psc = prescaler_for(core_clock, freq_hz)?;

    bus.clear_bits(CTLR1, CTLR1_DIR | CTLR1_CMS | CTLR1_CKD);
    bus.write(ATRLR, DEFAULT_PERIOD_TICKS);
    bus.write(PSC, u32::from(psc));
    bus.write(RPTCR, 0);
    bus.write(SWEVGR, SWEVGR_UG);

    bus.clear_bits(CCER, CCER_CC1E | CCER_CC1P);
    bus.modify(CHCTLR1, |v| {
        (v & !(CHCTLR1_OC1M | CHCTLR1_CC1S | CHCTLR1_OC1PE))
            | (OC_MODE_PWM1 << CHCTLR1_OC1M.trailing_zeros())
    });
    bus.write(CH1CVR, 0);
    bus.set_bits(BDTR, BDTR_MOE);

    bus.set_bits(CTLR1, CTLR1_ARPE);
    bus.set_bits(CTLR1, CTLR1_CEN);
    Ok(())
}

/// Apply one control operation
pub fn ctrl<B: RegisterBus>(bus: &B, channel: u32, ctrl: PwmCtrl) -> Result<Response, HalError> {
    check_channel(channel)?;
    match ctrl {
        PwmCtrl::On => bus.set_bits(CCER, CCER_CC1E),
        PwmCtrl::Off => bus.clear_bits(CCER, CCER_CC1E),
        PwmCtrl::SetDuty(ticks) => bus.write(CH1CVR, ticks),
        PwmCtrl::GetDuty => return Ok(Response::Value(bus.read(CH1CVR))),
        PwmCtrl::SetPeriod(0) => return Err(HalError::InvalidArgument),
        PwmCtrl::SetPeriod(ticks) => bus.write(ATRLR, ticks - 1),
        PwmCtrl::GetPeriod | PwmCtrl::GetMaxDuty => {
            return Ok(Response::Value(bus.read(ATRLR) + 1))
        }
        PwmCtrl::ActiveHigh => bus.clear_bits(CCER, CCER_CC1P),
        PwmCtrl::ActiveLow => bus.set_bits(CCER, CCER_CC1P),
    }
    Ok(Response::Done)
}

/// Disable the output and stop the counter
pub fn deinit<B: RegisterBus>(bus: &B, channel: u32) -> Result<(), HalError> {
    check_channel(channel)?;
    bus.clear_bits(CCER, CCER_CC1E);
    bus.clear_bits(CTLR1, CTLR1_CEN);
    Ok(())
}
