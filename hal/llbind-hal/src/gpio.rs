//! GPIO flag words and pin modes
//!
//! Callers describe a pin configuration with a packed [`GpioFlags`] word.
//! The bit positions are the same on every chip; each chip crate turns the
//! decoded [`PinMode`] into its own register layout.

use crate::error::HalError;

/// Packed GPIO configuration flags
///
/// ```text
///  7      4 3    2 1    0
/// ┌────────┬──────┬──────┐
/// │   AF   │  IN  │ OUT  │
/// └────────┴──────┴──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioFlags(pub u32);

impl GpioFlags {
    /// Output push-pull
    pub const OUT_PP: Self = Self(0x01);
    /// Output open-drain
    pub const OUT_OD: Self = Self(0x02);
    pub const OUT_MASK: u32 = 0x03;

    /// Analog input
    pub const AIN: Self = Self(0x00);
    /// Floating input
    pub const IN_FLOATING: Self = Self(0x01 << 2);
    /// Input with pull-up
    pub const IN_PU: Self = Self(0x02 << 2);
    /// Input with pull-down
    pub const IN_PD: Self = Self(0x03 << 2);
    pub const IN_MASK: u32 = 0x03 << 2;

    pub const AF_0: Self = Self(0x01 << 4);
    pub const AF_1: Self = Self(0x02 << 4);
    pub const AF_2: Self = Self(0x03 << 4);
    pub const AF_3: Self = Self(0x04 << 4);
    pub const AF_4: Self = Self(0x05 << 4);
    pub const AF_5: Self = Self(0x06 << 4);
    pub const AF_6: Self = Self(0x07 << 4);
    pub const AF_7: Self = Self(0x08 << 4);
    /// Alternate function, open-drain output stage
    pub const AF_OD: Self = Self(0x09 << 4);
    /// Alternate function, push-pull output stage
    pub const AF_PP: Self = Self(0x0A << 4);
    pub const AF_MASK: u32 = 0x0F << 4;

    /// Raw flag word
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Decode the flag word into a pin mode
    ///
    /// The AF nibble takes precedence, then the output bits, then the
    /// input bits. Combinations without a meaning are rejected.
    pub fn decode(self) -> Result<PinMode, HalError> {
        let flags = self.0;
        if flags & !(Self::AF_MASK | Self::IN_MASK | Self::OUT_MASK) != 0 {
            return Err(HalError::InvalidFlags);
        }

        let af = (flags & Self::AF_MASK) >> 4;
        if af != 0 {
            return match af {
                1..=8 => Ok(PinMode::Alternate(af as u8 - 1)),
                9 => Ok(PinMode::AlternateOpenDrain),
                10 => Ok(PinMode::AlternatePushPull),
                _ => Err(HalError::InvalidFlags),
            };
        }

        match flags & Self::OUT_MASK {
            0x01 => return Ok(PinMode::OutputPushPull),
            0x02 => return Ok(PinMode::OutputOpenDrain),
            0x03 => return Err(HalError::InvalidFlags),
            _ => {}
        }

        Ok(match flags & Self::IN_MASK {
            0x00 => PinMode::Analog,
            0x04 => PinMode::InputFloating,
            0x08 => PinMode::InputPullUp,
            _ => PinMode::InputPullDown,
        })
    }
}

impl From<u32> for GpioFlags {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Vendor-independent pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Analog,
    InputFloating,
    InputPullUp,
    InputPullDown,
    OutputPushPull,
    OutputOpenDrain,
    /// Alternate function number `n`, push-pull
    Alternate(u8),
    AlternatePushPull,
    AlternateOpenDrain,
}

impl PinMode {
    /// True if the pin drives its output stage
    pub fn is_output(self) -> bool {
        !matches!(
            self,
            PinMode::Analog
                | PinMode::InputFloating
                | PinMode::InputPullUp
                | PinMode::InputPullDown
        )
    }
}

/// External interrupt configuration for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ExtiFlag {
    /// Trigger on rising edges and enable the line
    Rising = 1,
    /// Trigger on falling edges and enable the line
    Falling = 2,
    /// Trigger on both edges and enable the line
    RisingFalling = 3,
    /// Re-enable the line with its current edges
    Enable = 4,
    /// Mask the line
    Disable = 5,
}

/// Raw register pointers of one GPIO port
///
/// Handed out for direct bit-banging; the pointers stay valid for as long
/// as the chip runs. Dereferencing them is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortReg {
    /// Port input data register
    pub idr: *const u16,
    /// Port output data register
    pub odr: *mut u16,
    /// Port bit set register
    pub bsr: *mut u16,
    /// Port bit reset register
    pub bcr: *mut u16,
}

impl PortReg {
    /// Build from register addresses
    pub fn from_addresses(idr: u32, odr: u32, bsr: u32, bcr: u32) -> Self {
        Self {
            idr: idr as usize as *const u16,
            odr: odr as usize as *mut u16,
            bsr: bsr as usize as *mut u16,
            bcr: bcr as usize as *mut u16,
        }
    }
}
