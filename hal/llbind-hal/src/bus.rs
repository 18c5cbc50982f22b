//! Register bus abstraction
//!
//! Every shim reaches the hardware through a [`RegisterBus`]: 32-bit reads
//! and writes at absolute addresses. On target this is [`Mmio`], a volatile
//! access to the memory-mapped peripheral. On the host the chip crates are
//! tested against a simulated bus that records every access.

/// 32-bit register access at absolute addresses
pub trait RegisterBus {
    /// Read the register at `addr`
    fn read(&self, addr: u32) -> u32;

    /// Write `value` to the register at `addr`
    fn write(&self, addr: u32, value: u32);

    /// Read-modify-write
    fn modify<F: FnOnce(u32) -> u32>(&self, addr: u32, f: F) {
        let value = self.read(addr);
        self.write(addr, f(value));
    }

    /// Set the bits of `mask`
    fn set_bits(&self, addr: u32, mask: u32) {
        self.modify(addr, |v| v | mask);
    }

    /// Clear the bits of `mask`
    fn clear_bits(&self, addr: u32, mask: u32) {
        self.modify(addr, |v| v & !mask);
    }

    /// Replace the field selected by `mask` with `value << mask.trailing_zeros()`
    fn write_field(&self, addr: u32, mask: u32, value: u32) {
        let shift = mask.trailing_zeros();
        self.modify(addr, |v| (v & !mask) | ((value << shift) & mask));
    }

    /// True if any bit of `mask` is set
    fn is_set(&self, addr: u32, mask: u32) -> bool {
        self.read(addr) & mask != 0
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    fn read(&self, addr: u32) -> u32 {
        (**self).read(addr)
    }

    fn write(&self, addr: u32, value: u32) {
        (**self).write(addr, value)
    }
}

/// Volatile memory-mapped register access
#[derive(Debug, Clone, Copy)]
pub struct Mmio {
    _private: (),
}

#[allow(unsafe_code)]
impl Mmio {
    /// Create the MMIO bus
    ///
    /// # Safety
    ///
    /// Every address later passed to [`RegisterBus::read`] or
    /// [`RegisterBus::write`] must be a valid, 4-byte aligned peripheral
    /// register of the running chip. The peripheral tables in the chip
    /// crates' default configuration satisfy this.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[allow(unsafe_code)]
impl RegisterBus for Mmio {
    #[inline]
    fn read(&self, addr: u32) -> u32 {
        // SAFETY: valid register address per the contract of `Mmio::new`
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    #[inline]
    fn write(&self, addr: u32, value: u32) {
        // SAFETY: valid register address per the contract of `Mmio::new`
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Single-register bus for exercising the provided methods
    struct OneReg(Cell<u32>);

    impl RegisterBus for OneReg {
        fn read(&self, _addr: u32) -> u32 {
            self.0.get()
        }

        fn write(&self, _addr: u32, value: u32) {
            self.0.set(value)
        }
    }

    #[test]
    fn test_bit_helpers() {
        let bus = OneReg(Cell::new(0));
        bus.set_bits(0, 0b1010);
        assert_eq!(bus.read(0), 0b1010);
        bus.clear_bits(0, 0b0010);
        assert_eq!(bus.read(0), 0b1000);
        assert!(bus.is_set(0, 0b1000));
        assert!(!bus.is_set(0, 0b0100));
    }

    #[test]
    fn test_write_field() {
        let bus = OneReg(Cell::new(0xFFFF_FFFF));
        bus.write_field(0, 0x0000_0F00, 0x3);
        assert_eq!(bus.read(0), 0xFFFF_F3FF);
    }

    #[test]
    fn test_reference_is_a_bus() {
        let bus = OneReg(Cell::new(0));
        let by_ref = &bus;
        by_ref.write(0, 7);
        assert_eq!(bus.read(0), 7);
    }
}
