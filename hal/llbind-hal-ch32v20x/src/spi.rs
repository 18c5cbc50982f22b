//! SPI master shim
//!
//! 8-bit full duplex, software NSS, polled transfers.

use llbind_hal::spi::{Mode, Phase, Polarity, SpiBusFlags};
use llbind_hal::{HalError, PeripheralTable, RegisterBus};

use crate::config::{Config, SpiBus};
use crate::regs::spi::*;

/// Poll budget per status flag before a byte is given up
const POLL_LIMIT: u32 = 200;

/// BR field for the fastest clock not above `baudrate`
fn baud_code(pclk: u32, baudrate: u32) -> u32 {
    if baudrate == 0 {
        return BR_DIV32;
    }
    let mut code = 0;
    while code < 7 && pclk / (2 << code) > baudrate {
        code += 1;
    }
    code
}

/// Configure a bus as master and enable it
pub fn init<B: RegisterBus>(
    bus: &B,
    config: &Config,
    id: u32,
    mode: Mode,
    flags: SpiBusFlags,
    baudrate: u32,
) -> Result<(), HalError> {
    let spi = config.spi.get(id)?;
    let br = baud_code(config.pclk(spi.apb), baudrate);

    let (polarity, phase): (Polarity, Phase) = mode.into();
    let mut bits = CTLR1_MSTR | CTLR1_SSI | CTLR1_SSM | (br << CTLR1_BR.trailing_zeros());
    if polarity == Polarity::IdleHigh {
        bits |= CTLR1_CPOL;
    }
    if phase == Phase::CaptureOnSecondTransition {
        bits |= CTLR1_CPHA;
    }
    if flags.lsb_first() {
        bits |= CTLR1_LSBFIRST;
    }
    debug!("spi{}: ctlr1 {=u32:x}", id, bits);

    bus.modify(spi.base + CTLR1, |v| (v & CTLR1_CLEAR_MASK) | bits);
    bus.write(spi.base + CRCR, CRC_POLYNOMIAL);
    bus.set_bits(spi.base + CTLR1, CTLR1_SPE);
    Ok(())
}

fn wait_flag<B: RegisterBus>(bus: &B, addr: u32, flag: u32) -> bool {
    (0..POLL_LIMIT).any(|_| bus.is_set(addr, flag))
}

/// Full-duplex transfer over the longer of the two buffers
pub fn transfer<B: RegisterBus>(
    bus: &B,
    spi: &PeripheralTable<SpiBus, 3>,
    id: u32,
    write: Option<&[u8]>,
    mut read: Option<&mut [u8]>,
) -> Result<(), HalError> {
    let spi = spi.get(id)?;
    let wlen = write.map_or(0, |w| w.len());
    let rlen = read.as_deref().map_or(0, |r| r.len());

    for i in 0..wlen.max(rlen) {
        let out = write.and_then(|w| w.get(i)).copied().unwrap_or(0);

        let mut byte = 0;
        if !wait_flag(bus, spi.base + STATR, STATR_TXE) {
            warn!("spi{}: TXE timeout at byte {}", id, i);
        } else {
            bus.write(spi.base + DATAR, u32::from(out));
            if wait_flag(bus, spi.base + STATR, STATR_RXNE) {
                byte = (bus.read(spi.base + DATAR) & 0xFF) as u8;
            } else {
                warn!("spi{}: RXNE timeout at byte {}", id, i);
            }
        }

        if let Some(slot) = read.as_deref_mut().and_then(|r| r.get_mut(i)) {
            *slot = byte;
        }
    }
    Ok(())
}

/// Disable a bus
pub fn deinit<B: RegisterBus>(
    bus: &B,
    spi: &PeripheralTable<SpiBus, 3>,
    id: u32,
) -> Result<(), HalError> {
    let spi = spi.get(id)?;
    bus.clear_bits(spi.base + CTLR1, CTLR1_SPE);
    Ok(())
}
