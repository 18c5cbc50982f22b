//! GPIO and EXTI shims
//!
//! Ports carry 8 pins. Every configured pin runs at speed level 3; the
//! input Schmitt trigger is left at its reset setting.

use llbind_hal::{ExtiFlag, GpioFlags, HalError, PeripheralTable, PinMode, PortReg, RegisterBus};

use crate::config::{Config, GpioPort};
use crate::interrupt::{disable_irq, enable_irq, set_priority};
use crate::regs::gpio::*;
use crate::regs::{exti, syscfg};

/// Priority of the EXTI interrupts
const EXTI_PRIORITY: u8 = 0;

fn resolve(
    ports: &PeripheralTable<GpioPort, 4>,
    port: u32,
    pin: u32,
) -> Result<GpioPort, HalError> {
    let gpio = ports.get(port)?;
    if pin >= GpioPort::PINS {
        return Err(HalError::InvalidIndex);
    }
    Ok(gpio)
}

/// Register fields of one pin: `(MODER, OTYPER open-drain, PUPDR, AF)`
fn fields(mode: PinMode) -> (u32, bool, u32, Option<u8>) {
    match mode {
        PinMode::Analog => (MODE_ANALOG, false, PULL_NONE, None),
        PinMode::InputFloating => (MODE_INPUT, false, PULL_NONE, None),
        PinMode::InputPullUp => (MODE_INPUT, false, PULL_UP, None),
        PinMode::InputPullDown => (MODE_INPUT, false, PULL_DOWN, None),
        PinMode::OutputPushPull => (MODE_OUTPUT, false, PULL_NONE, None),
        PinMode::OutputOpenDrain => (MODE_OUTPUT, true, PULL_NONE, None),
        PinMode::Alternate(af) => (MODE_AF, false, PULL_NONE, Some(af)),
        PinMode::AlternatePushPull => (MODE_AF, false, PULL_NONE, Some(0)),
        PinMode::AlternateOpenDrain => (MODE_AF, true, PULL_NONE, Some(0)),
    }
}

/// Configure one pin
pub fn init<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 4>,
    port: u32,
    pin: u32,
    flags: GpioFlags,
) -> Result<(), HalError> {
    let gpio = resolve(ports, port, pin)?;
    let mode = flags.decode()?;
    let (moder, open_drain, pull, af) = fields(mode);

    if let Some(af) = af {
        bus.write_field(gpio.base + AFRL, 0xF << (pin * 4), u32::from(af));
    }
    bus.write_field(gpio.base + OSPEEDR, 0b11 << (pin * 2), SPEED_LEVEL_3);
    if mode.is_output() {
        bus.write_field(gpio.base + OTYPER, 1 << pin, u32::from(open_drain));
    }
    bus.write_field(gpio.base + PUPDR, 0b11 << (pin * 2), pull);
    bus.write_field(gpio.base + MODER, 0b11 << (pin * 2), moder);
    Ok(())
}

/// Drive an output pin
pub fn set<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 4>,
    port: u32,
    pin: u32,
    level: bool,
) -> Result<(), HalError> {
    let gpio = resolve(ports, port, pin)?;
    if level {
        bus.write(gpio.base + BSRR, 1 << pin);
    } else {
        bus.write(gpio.base + BRR, 1 << pin);
    }
    Ok(())
}

/// Sampled input level
pub fn get_input<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 4>,
    port: u32,
    pin: u32,
) -> Result<bool, HalError> {
    let gpio = resolve(ports, port, pin)?;
    Ok(bus.is_set(gpio.base + IDR, 1 << pin))
}

/// Driven output level
pub fn get_output<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 4>,
    port: u32,
    pin: u32,
) -> Result<bool, HalError> {
    let gpio = resolve(ports, port, pin)?;
    Ok(bus.is_set(gpio.base + ODR, 1 << pin))
}

/// Data register addresses of a port
pub fn port_reg(ports: &PeripheralTable<GpioPort, 4>, port: u32) -> Result<PortReg, HalError> {
    let gpio = ports.get(port)?;
    Ok(PortReg::from_addresses(
        gpio.base + IDR,
        gpio.base + ODR,
        gpio.base + BSRR,
        gpio.base + BRR,
    ))
}

/// Configure the external interrupt of a pin
///
/// The line number is the pin number. Edge flags program the triggers and
/// unmask the line. `Enable` unmasks it and leaves RTSR/FTSR as they are;
/// it does not select both edges, so a line never given an edge stays
/// silent after `Enable`.
pub fn exti<B: RegisterBus>(
    bus: &B,
    config: &Config,
    port: u32,
    pin: u32,
    flag: ExtiFlag,
) -> Result<(), HalError> {
    resolve(&config.gpio, port, pin)?;
    let line = config.exti.get(pin)?;
    let mask = 1 << pin;

    let edges = match flag {
        ExtiFlag::Rising => Some((true, false)),
        ExtiFlag::Falling => Some((false, true)),
        ExtiFlag::RisingFalling => Some((true, true)),
        // Edges untouched, not reset to both
        ExtiFlag::Enable | ExtiFlag::Disable => None,
    };
    let enable = flag != ExtiFlag::Disable;

    if enable {
        bus.clear_bits(exti::EMR, mask);
        if let Some((rising, falling)) = edges {
            bus.write_field(exti::RTSR, mask, u32::from(rising));
            bus.write_field(exti::FTSR, mask, u32::from(falling));
        }
        bus.set_bits(exti::IMR, mask);
    } else {
        bus.clear_bits(exti::IMR, mask);
    }

    let cr = syscfg::EXTICR1 + 4 * (pin / 4);
    bus.write_field(cr, 0xF << (4 * (pin % 4)), port & 0x3);
    bus.write(exti::PR, mask);

    let irq = line.irq.number();
    if enable {
        set_priority(bus, irq, EXTI_PRIORITY);
        enable_irq(bus, irq);
    } else {
        disable_irq(bus, irq);
    }
    Ok(())
}

/// Parse a pin name such as `"PD2"` into `(port, pin)`
///
/// Ports A to D, pins 0 to 7.
pub fn parse_pin(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    let rest = s.strip_prefix('P')?;
    let mut chars = rest.chars();
    let port = match chars.next()? {
        c @ 'A'..='D' => c as u32 - 'A' as u32,
        _ => return None,
    };
    let pin: u32 = chars.as_str().parse().ok()?;
    if pin >= GpioPort::PINS {
        return None;
    }
    Some((port, pin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::nvic as nvic_regs;
    use crate::testutil::sim_bus;

    const PA: u32 = 0x5000_0000;
    const PD: u32 = 0x5000_0C00;

    fn field(bus: &llbind_sim::SimBus, addr: u32, pin: u32, width: u32) -> u32 {
        (bus.peek(addr) >> (pin * width)) & ((1 << width) - 1)
    }

    #[test]
    fn test_mode_table() {
        let config = Config::default();
        // (flags, MODER, OTYPER, PUPDR, AFRL)
        let cases = [
            (GpioFlags::OUT_PP, MODE_OUTPUT, 0, PULL_NONE, 0),
            (GpioFlags::OUT_OD, MODE_OUTPUT, 1, PULL_NONE, 0),
            (GpioFlags::AIN, MODE_ANALOG, 0, PULL_NONE, 0),
            (GpioFlags::IN_FLOATING, MODE_INPUT, 0, PULL_NONE, 0),
            (GpioFlags::IN_PU, MODE_INPUT, 0, PULL_UP, 0),
            (GpioFlags::IN_PD, MODE_INPUT, 0, PULL_DOWN, 0),
            (GpioFlags::AF_3, MODE_AF, 0, PULL_NONE, 3),
            (GpioFlags::AF_PP, MODE_AF, 0, PULL_NONE, 0),
            (GpioFlags::AF_OD, MODE_AF, 1, PULL_NONE, 0),
        ];
        for (flags, moder, otyper, pupdr, af) in cases {
            let bus = sim_bus();
            bus.poke(PA + AFRL, 0xFFFF_FFFF & !(0xF << 20));
            init(&bus, &config.gpio, 0, 5, flags).unwrap();
            assert_eq!(field(&bus, PA + MODER, 5, 2), moder, "{:#x}", flags.bits());
            assert_eq!(field(&bus, PA + OTYPER, 5, 1), otyper, "{:#x}", flags.bits());
            assert_eq!(field(&bus, PA + PUPDR, 5, 2), pupdr, "{:#x}", flags.bits());
            assert_eq!(field(&bus, PA + AFRL, 5, 4), af, "{:#x}", flags.bits());
            assert_eq!(field(&bus, PA + OSPEEDR, 5, 2), SPEED_LEVEL_3);
        }
    }

    #[test]
    fn test_neighbours_untouched() {
        let bus = sim_bus();
        let config = Config::default();
        bus.poke(PA + MODER, 0xFFFF);
        init(&bus, &config.gpio, 0, 2, GpioFlags::IN_FLOATING).unwrap();
        assert_eq!(bus.peek(PA + MODER), 0xFFCF);
    }

    #[test]
    fn test_set_get() {
        let bus = sim_bus();
        let config = Config::default();
        set(&bus, &config.gpio, 3, 4, true).unwrap();
        assert_eq!(get_output(&bus, &config.gpio, 3, 4), Ok(true));
        assert_eq!(bus.peek(PD + ODR), 1 << 4);
        set(&bus, &config.gpio, 3, 4, false).unwrap();
        assert_eq!(get_output(&bus, &config.gpio, 3, 4), Ok(false));

        bus.poke(PD + IDR, 1 << 7);
        assert_eq!(get_input(&bus, &config.gpio, 3, 7), Ok(true));
    }

    #[test]
    fn test_invalid_port_and_pin() {
        let bus = sim_bus();
        let config = Config::default();
        assert_eq!(
            init(&bus, &config.gpio, 4, 0, GpioFlags::OUT_PP),
            Err(HalError::InvalidIndex)
        );
        assert_eq!(set(&bus, &config.gpio, 0, 8, true), Err(HalError::InvalidIndex));
        assert_eq!(get_input(&bus, &config.gpio, 9, 0), Err(HalError::InvalidIndex));
        assert_eq!(
            exti(&bus, &config, 0, 8, ExtiFlag::Rising),
            Err(HalError::InvalidIndex)
        );
        assert!(bus.accesses().is_empty());
    }

    #[test]
    fn test_exti_rising() {
        let bus = sim_bus();
        let config = Config::default();
        bus.poke(exti::FTSR, 1 << 6);
        bus.poke(exti::PR, 1 << 6);
        exti(&bus, &config, 3, 6, ExtiFlag::Rising).unwrap();

        assert_eq!(bus.peek(exti::IMR), 1 << 6);
        assert_eq!(bus.peek(exti::RTSR), 1 << 6);
        assert_eq!(bus.peek(exti::FTSR), 0);
        assert_eq!(bus.peek(exti::PR), 0);
        // Line 6: EXTICR2 bits 8..11
        assert_eq!(bus.peek(syscfg::EXTICR1 + 4), 3 << 8);
        // EXTI6 is IRQ 21
        assert_eq!(bus.writes_to(nvic_regs::ISER), vec![1 << 21]);
        assert_eq!(bus.peek(nvic_regs::IPR + 20) & (0xFF << 8), 0);
    }

    #[test]
    fn test_exti_enable_keeps_edges_and_disable_masks() {
        let bus = sim_bus();
        let config = Config::default();
        exti(&bus, &config, 0, 1, ExtiFlag::RisingFalling).unwrap();
        exti(&bus, &config, 0, 1, ExtiFlag::Disable).unwrap();
        assert_eq!(bus.peek(exti::IMR), 0);
        assert_eq!(bus.writes_to(nvic_regs::ICER), vec![1 << 6]);

        exti(&bus, &config, 0, 1, ExtiFlag::Enable).unwrap();
        assert_eq!(bus.peek(exti::IMR), 1 << 1);
        assert_eq!(bus.peek(exti::RTSR), 1 << 1);
        assert_eq!(bus.peek(exti::FTSR), 1 << 1);
    }

    #[test]
    fn test_exti_enable_on_fresh_line_sets_no_edge() {
        let bus = sim_bus();
        let config = Config::default();
        exti(&bus, &config, 1, 4, ExtiFlag::Enable).unwrap();
        assert_eq!(bus.peek(exti::IMR), 1 << 4);
        assert_eq!(bus.peek(exti::RTSR), 0);
        assert_eq!(bus.peek(exti::FTSR), 0);
        assert!(!bus.touched(exti::RTSR, exti::FTSR + 4));
    }

    #[test]
    fn test_port_reg() {
        let config = Config::default();
        let regs = port_reg(&config.gpio, 3).unwrap();
        assert_eq!(regs.idr as usize, 0x5000_0C10);
        assert_eq!(regs.bsr as usize, 0x5000_0C18);
        assert_eq!(regs.bcr as usize, 0x5000_0C28);
    }

    #[test]
    fn test_parse_pin() {
        assert_eq!(parse_pin("PD2"), Some((3, 2)));
        assert_eq!(parse_pin(" PA0 "), Some((0, 0)));
        assert_eq!(parse_pin("PE1"), None);
        assert_eq!(parse_pin("PB8"), None);
        assert_eq!(parse_pin("PB"), None);
        assert_eq!(parse_pin("D2"), None);
    }
}
