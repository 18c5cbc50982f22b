//! DMA flag words and transfer planning
//!
//! A DMA request names a source and a destination, each an address plus an
//! element count, and a packed [`DmaFlags`] word:
//!
//! ```text
//!  8     7   6 5   4 3   2 1   0
//! ┌──────┬─────┬─────┬─────┬─────┐
//! │ CIRC │ INC │ DIR │ DST │ SRC │
//! └──────┴─────┴─────┴─────┴─────┘
//! ```
//!
//! [`DmaFlags::plan`] turns that request into a [`ChannelPlan`] expressed
//! the way channel hardware sees it: a peripheral side and a memory side.

use crate::error::HalError;

/// Packed DMA flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaFlags(pub u32);

impl DmaFlags {
    pub const SRC_BYTE: u32 = 0x01;
    pub const SRC_HALFWORD: u32 = 0x02;
    pub const SRC_WORD: u32 = 0x03;
    pub const SRC_MASK: u32 = 0x03;

    pub const DST_BYTE: u32 = 0x01 << 2;
    pub const DST_HALFWORD: u32 = 0x02 << 2;
    pub const DST_WORD: u32 = 0x03 << 2;
    pub const DST_MASK: u32 = 0x03 << 2;

    pub const PERIPH_TO_MEM: u32 = 0x01 << 4;
    pub const MEM_TO_PERIPH: u32 = 0x02 << 4;
    pub const MEM_TO_MEM: u32 = 0x03 << 4;
    pub const DIR_MASK: u32 = 0x03 << 4;

    pub const NONE_INC: u32 = 0x00;
    pub const SRC_INC: u32 = 0x01 << 6;
    pub const DST_INC: u32 = 0x02 << 6;
    pub const BOTH_INC: u32 = 0x03 << 6;
    pub const INC_MASK: u32 = 0x03 << 6;

    pub const CIRCULAR_ON: u32 = 0x01 << 8;

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Decode direction, widths, increments and mode
    ///
    /// Fields are checked in the order direction, source width,
    /// destination width; the first bad one decides the error.
    pub fn decode(self) -> Result<DmaMode, HalError> {
        let direction = match self.0 & Self::DIR_MASK {
            Self::PERIPH_TO_MEM => Direction::PeriphToMem,
            Self::MEM_TO_PERIPH => Direction::MemToPeriph,
            Self::MEM_TO_MEM => Direction::MemToMem,
            _ => return Err(HalError::InvalidDirection),
        };
        let src_width =
            DataWidth::from_field(self.0 & Self::SRC_MASK).ok_or(HalError::InvalidSrcSize)?;
        let dst_width = DataWidth::from_field((self.0 & Self::DST_MASK) >> 2)
            .ok_or(HalError::InvalidDstSize)?;
        let inc = self.0 & Self::INC_MASK;

        Ok(DmaMode {
            direction,
            src_width,
            dst_width,
            src_inc: inc == Self::SRC_INC || inc == Self::BOTH_INC,
            dst_inc: inc == Self::DST_INC || inc == Self::BOTH_INC,
            circular: self.0 & Self::CIRCULAR_ON != 0,
        })
    }

    /// Decode the flags and lay the transfer out on a channel
    pub fn plan(self, src: DmaEndpoint, dst: DmaEndpoint) -> Result<ChannelPlan, HalError> {
        let mode = self.decode()?;
        let count = reconcile_buffer_size(src.size, dst.size)?;
        Ok(mode.plan(src.addr, dst.addr, count))
    }
}

impl From<u32> for DmaFlags {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    PeriphToMem,
    MemToPeriph,
    MemToMem,
}

/// Element width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    Byte,
    HalfWord,
    Word,
}

impl DataWidth {
    fn from_field(field: u32) -> Option<Self> {
        match field {
            1 => Some(DataWidth::Byte),
            2 => Some(DataWidth::HalfWord),
            3 => Some(DataWidth::Word),
            _ => None,
        }
    }

    /// Two-bit size code used by the channel configuration registers
    pub const fn size_code(self) -> u32 {
        match self {
            DataWidth::Byte => 0,
            DataWidth::HalfWord => 1,
            DataWidth::Word => 2,
        }
    }
}

/// Decoded flag word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaMode {
    pub direction: Direction,
    pub src_width: DataWidth,
    pub dst_width: DataWidth,
    pub src_inc: bool,
    pub dst_inc: bool,
    pub circular: bool,
}

impl DmaMode {
    /// Assign source and destination to the peripheral and memory sides
    ///
    /// Peripheral-to-memory and memory-to-memory read from the peripheral
    /// side; memory-to-peripheral reads from the memory side.
    pub fn plan(&self, src_addr: u32, dst_addr: u32, count: u32) -> ChannelPlan {
        let src = Side {
            addr: src_addr,
            width: self.src_width,
            inc: self.src_inc,
        };
        let dst = Side {
            addr: dst_addr,
            width: self.dst_width,
            inc: self.dst_inc,
        };
        let (periph, mem) = match self.direction {
            Direction::PeriphToMem | Direction::MemToMem => (src, dst),
            Direction::MemToPeriph => (dst, src),
        };
        ChannelPlan {
            periph,
            mem,
            mem_to_periph: self.direction == Direction::MemToPeriph,
            mem_to_mem: self.direction == Direction::MemToMem,
            circular: self.circular,
            count,
        }
    }
}

/// One end of a transfer as the caller names it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaEndpoint {
    pub addr: u32,
    /// Element count, 0 when the side is a fixed register
    pub size: u32,
}

impl DmaEndpoint {
    pub const fn new(addr: u32, size: u32) -> Self {
        Self { addr, size }
    }
}

/// One end of a transfer as the channel sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Side {
    pub addr: u32,
    pub width: DataWidth,
    pub inc: bool,
}

/// Everything needed to program a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelPlan {
    pub periph: Side,
    pub mem: Side,
    /// Read from memory, write to the peripheral side
    pub mem_to_periph: bool,
    pub mem_to_mem: bool,
    pub circular: bool,
    /// Elements to transfer
    pub count: u32,
}

/// Pick the transfer length from the two declared buffer sizes
///
/// A zero size means "fixed register, no length of its own": the other side
/// decides. With both sizes known, the shorter buffer wins.
pub fn reconcile_buffer_size(src: u32, dst: u32) -> Result<u32, HalError> {
    match (src, dst) {
        (0, 0) => Err(HalError::InvalidBufferSize),
        (0, n) | (n, 0) => Ok(n),
        (s, d) => Ok(s.min(d)),
    }
}

/// Channel control operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum DmaCtrl {
    Start = 0,
    Stop = 1,
    /// Busy-wait for transfer complete; returns at once on a disabled channel
    Wait = 2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const P2M_BYTES: u32 = DmaFlags::PERIPH_TO_MEM | DmaFlags::SRC_BYTE | DmaFlags::DST_BYTE;

    #[test]
    fn test_validation_order() {
        // Everything wrong: direction is reported first
        assert_eq!(DmaFlags(0).decode(), Err(HalError::InvalidDirection));
        assert_eq!(
            DmaFlags(DmaFlags::MEM_TO_MEM).decode(),
            Err(HalError::InvalidSrcSize)
        );
        assert_eq!(
            DmaFlags(DmaFlags::MEM_TO_MEM | DmaFlags::SRC_WORD).decode(),
            Err(HalError::InvalidDstSize)
        );
        assert_eq!(
            DmaFlags(P2M_BYTES).plan(DmaEndpoint::new(0, 0), DmaEndpoint::new(0, 0)),
            Err(HalError::InvalidBufferSize)
        );
    }

    #[test]
    fn test_periph_to_mem_sides() {
        let flags = DmaFlags(
            DmaFlags::PERIPH_TO_MEM | DmaFlags::SRC_HALFWORD | DmaFlags::DST_WORD | DmaFlags::DST_INC,
        );
        let plan = flags
            .plan(DmaEndpoint::new(0x4001_244C, 0), DmaEndpoint::new(0x2000_0000, 16))
            .unwrap();
        assert_eq!(plan.periph.addr, 0x4001_244C);
        assert_eq!(plan.periph.width, DataWidth::HalfWord);
        assert!(!plan.periph.inc);
        assert_eq!(plan.mem.addr, 0x2000_0000);
        assert_eq!(plan.mem.width, DataWidth::Word);
        assert!(plan.mem.inc);
        assert!(!plan.mem_to_periph);
        assert_eq!(plan.count, 16);
    }

    #[test]
    fn test_mem_to_periph_swaps_sides() {
        let flags = DmaFlags(
            DmaFlags::MEM_TO_PERIPH
                | DmaFlags::SRC_BYTE
                | DmaFlags::DST_HALFWORD
                | DmaFlags::SRC_INC
                | DmaFlags::CIRCULAR_ON,
        );
        let plan = flags
            .plan(DmaEndpoint::new(0x2000_0100, 8), DmaEndpoint::new(0x4001_3804, 0))
            .unwrap();
        assert_eq!(plan.mem.addr, 0x2000_0100);
        assert_eq!(plan.mem.width, DataWidth::Byte);
        assert!(plan.mem.inc);
        assert_eq!(plan.periph.addr, 0x4001_3804);
        assert_eq!(plan.periph.width, DataWidth::HalfWord);
        assert!(!plan.periph.inc);
        assert!(plan.mem_to_periph);
        assert!(plan.circular);
    }

    #[test]
    fn test_mem_to_mem_both_inc() {
        let flags = DmaFlags(
            DmaFlags::MEM_TO_MEM | DmaFlags::SRC_WORD | DmaFlags::DST_WORD | DmaFlags::BOTH_INC,
        );
        let mode = flags.decode().unwrap();
        assert!(mode.src_inc && mode.dst_inc);
        let plan = mode.plan(0x2000_0000, 0x2000_1000, 4);
        assert!(plan.mem_to_mem);
        assert_eq!(plan.periph.addr, 0x2000_0000);
    }

    proptest! {
        #[test]
        fn test_zero_side_takes_other(n in 1u32..) {
            prop_assert_eq!(reconcile_buffer_size(0, n), Ok(n));
            prop_assert_eq!(reconcile_buffer_size(n, 0), Ok(n));
        }

        #[test]
        fn test_both_sides_take_minimum(a in 1u32.., b in 1u32..) {
            prop_assert_eq!(reconcile_buffer_size(a, b), Ok(a.min(b)));
        }
    }
}
