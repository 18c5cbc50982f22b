//! GPIO shim
//!
//! Each pin owns a 4-bit field `MODE | CNF << 2` in CFGLR (pins 0..7) or
//! CFGHR (pins 8..15). Pull direction of an input with pull is the pin's
//! OUTDR bit.

use llbind_hal::{GpioFlags, HalError, PeripheralTable, PinMode, PortReg, RegisterBus};

use crate::config::GpioPort;
use crate::regs::gpio::*;

fn resolve(
    ports: &PeripheralTable<GpioPort, 7>,
    port: u32,
    pin: u32,
) -> Result<GpioPort, HalError> {
    let gpio = ports.get(port)?;
    if pin >= GpioPort::PINS {
        return Err(HalError::InvalidIndex);
    }
    Ok(gpio)
}

/// `(MODE, CNF)` for a pin mode
fn mode_bits(mode: PinMode) -> (u32, u32) {
    match mode {
        PinMode::Analog => (MODE_INPUT, CNF_IN_ANALOG),
        PinMode::InputFloating => (MODE_INPUT, CNF_IN_FLOATING),
        PinMode::InputPullUp | PinMode::InputPullDown => (MODE_INPUT, CNF_IN_PULL),
        PinMode::OutputPushPull => (MODE_OUT_50MHZ, CNF_OUT_PP),
        PinMode::OutputOpenDrain => (MODE_OUT_50MHZ, CNF_OUT_OD),
        // Alternate functions are routed through AFIO remap, not per pin
        PinMode::Alternate(_) | PinMode::AlternatePushPull => (MODE_OUT_50MHZ, CNF_AF_PP),
        PinMode::AlternateOpenDrain => (MODE_OUT_50MHZ, CNF_AF_OD),
    }
}

/// Configure one pin
pub fn init<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 7>,
    port: u32,
    pin: u32,
    flags: GpioFlags,
) -> Result<(), HalError> {
    let gpio = resolve(ports, port, pin)?;
    let mode = flags.decode()?;
    let (mode_field, cnf) = mode_bits(mode);

    match mode {
        PinMode::InputPullUp => bus.write(gpio.base + BSHR, 1 << pin),
        PinMode::InputPullDown => bus.write(gpio.base + BCR, 1 << pin),
        _ => {}
    }

    let (reg, shift) = if pin < 8 {
        (CFGLR, pin * 4)
    } else {
        (CFGHR, (pin - 8) * 4)
    };
    bus.write_field(gpio.base + reg, 0xF << shift, mode_field | cnf << 2);
    Ok(())
}

/// Drive an output pin
pub fn set<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 7>,
    port: u32,
    pin: u32,
    level: bool,
) -> Result<(), HalError> {
    let gpio = resolve(ports, port, pin)?;
    if level {
        bus.write(gpio.base + BSHR, 1 << pin);
    } else {
        bus.write(gpio.base + BCR, 1 << pin);
    }
    Ok(())
}

/// Sampled input level
pub fn get_input<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 7>,
    port: u32,
    pin: u32,
) -> Result<bool, HalError> {
    let gpio = resolve(ports, port, pin)?;
    Ok(bus.is_set(gpio.base + INDR, 1 << pin))
}

/// Driven output level
pub fn get_output<B: RegisterBus>(
    bus: &B,
    ports: &PeripheralTable<GpioPort, 7>,
    port: u32,
    pin: u32,
) -> Result<bool, HalError> {
    let gpio = resolve(ports, port, pin)?;
    Ok(bus.is_set(gpio.base + OUTDR, 1 << pin))
}

/// Data register addresses of a port
pub fn port_reg(ports: &PeripheralTable<GpioPort, 7>, port: u32) -> Result<PortReg, HalError> {
    let gpio = ports.get(port)?;
    Ok(PortReg::from_addresses(
        gpio.base + INDR,
        gpio.base + OUTDR,
        gpio.base + BSHR,
        gpio.base + BCR,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testutil::sim_bus;

    const PA: u32 = 0x4001_0800;
    const PC: u32 = 0x4001_1000;

    fn cfg_nibble(bus: &llbind_sim::SimBus, base: u32, pin: u32) -> u32 {
        let (reg, shift) = if pin < 8 { (CFGLR, pin * 4) } else { (CFGHR, (pin - 8) * 4) };
        (bus.peek(base + reg) >> shift) & 0xF
    }

    #[test]
    fn test_mode_table() {
        let config = Config::default();
        let cases = [
            (GpioFlags::OUT_PP, 0b0011),
            (GpioFlags::OUT_OD, 0b0111),
            (GpioFlags::AIN, 0b0000),
            (GpioFlags::IN_FLOATING, 0b0100),
            (GpioFlags::IN_PU, 0b1000),
            (GpioFlags::IN_PD, 0b1000),
            (GpioFlags::AF_PP, 0b1011),
            (GpioFlags::AF_OD, 0b1111),
            (GpioFlags::AF_0, 0b1011),
            (GpioFlags::AF_7, 0b1011),
        ];
        for (flags, nibble) in cases {
            let bus = sim_bus();
            init(&bus, &config.gpio, 0, 3, flags).unwrap();
            assert_eq!(cfg_nibble(&bus, PA, 3), nibble, "flags {:#x}", flags.bits());
        }
    }

    #[test]
    fn test_high_pins_use_cfghr() {
        let bus = sim_bus();
        let config = Config::default();
        bus.poke(PC + CFGHR, 0x4444_4444);
        init(&bus, &config.gpio, 2, 13, GpioFlags::OUT_PP).unwrap();
        assert_eq!(bus.peek(PC + CFGHR), 0x4434_4444);
        assert_eq!(bus.peek(PC + CFGLR), 0);
    }

    #[test]
    fn test_pull_direction_through_outdr() {
        let bus = sim_bus();
        let config = Config::default();
        init(&bus, &config.gpio, 0, 4, GpioFlags::IN_PU).unwrap();
        assert_eq!(bus.peek(PA + OUTDR), 1 << 4);
        init(&bus, &config.gpio, 0, 4, GpioFlags::IN_PD).unwrap();
        assert_eq!(bus.peek(PA + OUTDR), 0);
    }

    #[test]
    fn test_bad_flags_touch_nothing() {
        let bus = sim_bus();
        let config = Config::default();
        assert_eq!(
            init(&bus, &config.gpio, 0, 1, GpioFlags(0x03)),
            Err(HalError::InvalidFlags)
        );
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn test_set_and_read_back() {
        let bus = sim_bus();
        let config = Config::default();
        set(&bus, &config.gpio, 2, 13, true).unwrap();
        assert_eq!(bus.peek(PC + OUTDR), 1 << 13);
        assert_eq!(get_output(&bus, &config.gpio, 2, 13), Ok(true));
        set(&bus, &config.gpio, 2, 13, false).unwrap();
        assert_eq!(get_output(&bus, &config.gpio, 2, 13), Ok(false));

        bus.poke(PC + INDR, 1 << 2);
        assert_eq!(get_input(&bus, &config.gpio, 2, 2), Ok(true));
        assert_eq!(get_input(&bus, &config.gpio, 2, 3), Ok(false));
    }

    #[test]
    fn test_invalid_port_and_pin() {
        let bus = sim_bus();
        let config = Config::default();
        assert_eq!(set(&bus, &config.gpio, 7, 0, true), Err(HalError::InvalidIndex));
        assert_eq!(set(&bus, &config.gpio, 0, 16, true), Err(HalError::InvalidIndex));
        assert_eq!(get_input(&bus, &config.gpio, 9, 0), Err(HalError::InvalidIndex));
        assert_eq!(get_output(&bus, &config.gpio, 0, 99), Err(HalError::InvalidIndex));
        assert!(bus.accesses().is_empty());
    }

    #[test]
    fn test_port_reg() {
        let config = Config::default();
        let regs = port_reg(&config.gpio, 1).unwrap();
        assert_eq!(regs.idr as usize, 0x4001_0C08);
        assert_eq!(regs.odr as usize, 0x4001_0C0C);
        assert_eq!(regs.bsr as usize, 0x4001_0C10);
        assert_eq!(regs.bcr as usize, 0x4001_0C14);
        assert_eq!(port_reg(&config.gpio, 7), Err(HalError::InvalidIndex));
    }
}
