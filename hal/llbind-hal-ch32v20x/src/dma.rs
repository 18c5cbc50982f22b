//! DMA1 shim
//!
//! Channels are programmed from a [`ChannelPlan`]; the transfer starts only
//! on `DmaCtrl::Start`.

use llbind_hal::dma::{ChannelPlan, DmaCtrl, DmaEndpoint, DmaFlags};
use llbind_hal::{HalError, PeripheralTable, RegisterBus};

use crate::config::DmaChannel;
use crate::regs::dma::*;

fn cfgr_bits(plan: &ChannelPlan) -> u32 {
    let mut cfgr = (plan.periph.width.size_code() << CFGR_PSIZE.trailing_zeros())
        | (plan.mem.width.size_code() << CFGR_MSIZE.trailing_zeros())
        | (PRIORITY_VERY_HIGH << CFGR_PL.trailing_zeros());
    if plan.mem_to_periph {
        cfgr |= CFGR_DIR;
    }
    if plan.circular {
        cfgr |= CFGR_CIRC;
    }
    if plan.periph.inc {
        cfgr |= CFGR_PINC;
    }
    if plan.mem.inc {
        cfgr |= CFGR_MINC;
    }
    if plan.mem_to_mem {
        cfgr |= CFGR_MEM2MEM;
    }
    cfgr
}

/// Program a channel without starting it
pub fn init<B: RegisterBus>(
    bus: &B,
    channels: &PeripheralTable<DmaChannel, 9>,
    channel: u32,
    src: DmaEndpoint,
    dst: DmaEndpoint,
    flags: DmaFlags,
) -> Result<(), HalError> {
    let ch = channels.get(channel)?;
    let plan = flags.plan(src, dst)?;
    debug!("dma{}: {}", channel, plan);

    bus.write(ch.base + CNTR, plan.count);
    bus.write(ch.base + PADDR, plan.periph.addr);
    bus.write(ch.base + MADDR, plan.mem.addr);
    bus.modify(ch.base + CFGR, |v| (v & !CFGR_CLEAR_MASK) | cfgr_bits(&plan));
    bus.write(INTFCR, ch.tc_mask);
    Ok(())
}

/// Start, stop or wait for a channel
///
/// `Wait` on a disabled channel returns at once.
pub fn ctrl<B: RegisterBus>(
    bus: &B,
    channels: &PeripheralTable<DmaChannel, 9>,
    channel: u32,
    ctrl: DmaCtrl,
) -> Result<(), HalError> {
    let ch = channels.get(channel)?;
    match ctrl {
        DmaCtrl::Start => bus.set_bits(ch.base + CFGR, CFGR_EN),
        DmaCtrl::Stop => bus.clear_bits(ch.base + CFGR, CFGR_EN),
        DmaCtrl::Wait => {
            if bus.is_set(ch.base + CFGR, CFGR_EN) {
                while !bus.is_set(INTFR, ch.tc_mask) {}
            }
        }
    }
    Ok(())
}

/// Disable a channel and return its registers to reset values
pub fn deinit<B: RegisterBus>(
    bus: &B,
    channels: &PeripheralTable<DmaChannel, 9>,
    channel: u32,
) -> Result<(), HalError> {
    let ch = channels.get(channel)?;
    bus.clear_bits(ch.base + CFGR, CFGR_EN);
    bus.write(ch.base + CFGR, 0);
    bus.write(ch.base + CNTR, 0);
    bus.write(ch.base + PADDR, 0);
    bus.write(ch.base + MADDR, 0);
    bus.write(INTFCR, ch.all_flags());
    Ok(())
}
