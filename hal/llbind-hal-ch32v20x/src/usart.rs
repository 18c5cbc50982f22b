//! USART shim: 8-N-1, TX and RX, no flow control

use llbind_hal::uart::{UartConfig, UsartFlags};
use llbind_hal::{HalError, PeripheralTable, RegisterBus};

use crate::config::{Config, UsartPort};
use crate::interrupt::{disable_irq, enable_irq, set_priority};
use crate::regs::usart::*;

const RX_IRQ_PREEMPT: u8 = 1;
const RX_IRQ_SUB: u8 = 1;

/// Configure and enable a port
pub fn init<B: RegisterBus>(
    bus: &B,
    config: &Config,
    id: u32,
    flags: UsartFlags,
    baudrate: u32,
) -> Result<(), HalError> {
    let port = config.usart.get(id)?;
    let uart = UartConfig::with_baudrate(baudrate)?;
    trace!("usart{}: flags {=u32:x} ignored", id, flags.0);

    bus.clear_bits(port.base + CTLR2, CTLR2_STOP);
    bus.modify(port.base + CTLR1, |v| {
        (v & !(CTLR1_M | CTLR1_PCE | CTLR1_PS)) | CTLR1_TE | CTLR1_RE
    });
    bus.clear_bits(port.base + CTLR3, CTLR3_RTSE | CTLR3_CTSE);
    bus.write(port.base + BRR, uart.divider(config.pclk(port.apb)));

    if let Some(irq) = port.rx_irq {
        bus.set_bits(port.base + CTLR1, CTLR1_RXNEIE);
        set_priority(bus, irq, RX_IRQ_PREEMPT, RX_IRQ_SUB);
        enable_irq(bus, irq);
    }

    bus.set_bits(port.base + CTLR1, CTLR1_UE);
    Ok(())
}

/// Blocking write, one byte at a time
pub fn write<B: RegisterBus>(
    bus: &B,
    usart: &PeripheralTable<UsartPort, 5>,
    id: u32,
    data: &[u8],
) -> Result<(), HalError> {
    let port = usart.get(id)?;
    write_port(bus, port, data);
    Ok(())
}

fn write_port<B: RegisterBus>(bus: &B, port: UsartPort, data: &[u8]) {
    for &byte in data {
        while !bus.is_set(port.base + STATR, STATR_TXE) {}
        bus.write(port.base + DATAR, u32::from(byte));
    }
}

/// Disable a port and its RX interrupt
pub fn deinit<B: RegisterBus>(
    bus: &B,
    usart: &PeripheralTable<UsartPort, 5>,
    id: u32,
) -> Result<(), HalError> {
    let port = usart.get(id)?;
    bus.clear_bits(port.base + CTLR1, CTLR1_UE | CTLR1_RXNEIE);
    if let Some(irq) = port.rx_irq {
        disable_irq(bus, irq);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::pfic;
    use crate::testutil::sim_bus;

    const USART1: u32 = 0x4001_3800;
    const USART2: u32 = 0x4000_4400;

    #[test]
    fn test_init_8n1() {
        let bus = sim_bus();
        let config = Config::default();
        bus.poke(USART1 + CTLR1, CTLR1_M | CTLR1_PCE);
        bus.poke(USART1 + CTLR2, CTLR2_STOP);
        init(&bus, &config, 1, UsartFlags(0), 115_200).unwrap();

        assert_eq!(bus.peek(USART1 + CTLR1), CTLR1_TE | CTLR1_RE | CTLR1_UE);
        assert_eq!(bus.peek(USART1 + CTLR2), 0);
        // 144 MHz / 115200 = 1250
        assert_eq!(bus.peek(USART1 + BRR), 1250);
        assert!(!bus.touched(pfic::IENR, pfic::IENR + 8));
    }

    #[test]
    fn test_flags_do_not_change_frame() {
        let bus = sim_bus();
        let config = Config::default();
        init(&bus, &config, 1, UsartFlags(0x1FF), 115_200).unwrap();
        assert_eq!(bus.peek(USART1 + CTLR1), CTLR1_TE | CTLR1_RE | CTLR1_UE);
        assert_eq!(bus.peek(USART1 + CTLR2) & CTLR2_STOP, 0);
    }

    #[test]
    fn test_usart2_enables_rx_interrupt() {
        let bus = sim_bus();
        let config = Config::default();
        init(&bus, &config, 2, UsartFlags(0), 9600).unwrap();
        assert_ne!(bus.peek(USART2 + CTLR1) & CTLR1_RXNEIE, 0);
        // IRQ 54: IENR word 1, bit 22
        assert_eq!(bus.writes_to(pfic::IENR + 4), vec![1 << 22]);
        // Byte 2 of IPRIOR word 13
        assert_eq!((bus.peek(pfic::IPRIOR + 52) >> 16) & 0xFF, 0x50);

        deinit(&bus, &config.usart, 2).unwrap();
        assert_eq!(bus.peek(USART2 + CTLR1) & (CTLR1_UE | CTLR1_RXNEIE), 0);
        assert_eq!(bus.writes_to(pfic::IRER + 4), vec![1 << 22]);
    }

    #[test]
    fn test_zero_baud_rejected() {
        let bus = sim_bus();
        let config = Config::default();
        assert_eq!(
            init(&bus, &config, 1, UsartFlags(0), 0),
            Err(HalError::InvalidArgument)
        );
        assert!(bus.accesses().is_empty());
    }

    #[test]
    fn test_write_bytes_in_order() {
        let bus = sim_bus();
        let config = Config::default();
        write(&bus, &config.usart, 3, b"ok\n").unwrap();
        assert_eq!(
            bus.writes_to(0x4000_4800 + DATAR),
            vec![u32::from(b'o'), u32::from(b'k'), u32::from(b'\n')]
        );
    }

    #[test]
    fn test_invalid_port() {
        let bus = sim_bus();
        let config = Config::default();
        assert_eq!(
            init(&bus, &config, 0, UsartFlags(0), 115_200),
            Err(HalError::InvalidIndex)
        );
        assert_eq!(write(&bus, &config.usart, 5, b"x"), Err(HalError::InvalidIndex));
        assert_eq!(deinit(&bus, &config.usart, 9), Err(HalError::InvalidIndex));
        assert!(bus.accesses().is_empty());
    }
}
