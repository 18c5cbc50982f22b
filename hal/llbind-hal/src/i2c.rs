//! I2C backend strategy
//!
//! None of the supported chips get a register-level I2C driver here. The
//! chip driver is handed an [`I2cBackend`] at construction instead: either
//! [`NoI2c`], which fails every transfer, or any `embedded_hal` bus wrapped
//! in [`EmbeddedHalI2c`] (a bit-banged bus, for instance).
//!
//! Bus ids and address widths from the caller are not forwarded; a chip
//! has exactly one I2C backend.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

/// I2C backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// No backend installed
    NoBackend,
    /// Device address does not fit the backend's address mode
    Address(u16),
    /// The bus reported an error
    Bus(ErrorKind),
}

/// I2C master operations used by the dispatcher
pub trait I2cBackend {
    /// Prepare the bus
    fn init(&mut self, config: I2cConfig, flags: u32) -> Result<(), I2cError>;

    /// Read `buf.len()` bytes from the device at `address`
    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), I2cError>;

    /// Write `data` to the device at `address`
    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), I2cError>;

    /// Write then read with a repeated start
    fn write_read(&mut self, address: u16, data: &[u8], buf: &mut [u8]) -> Result<(), I2cError>;
}

/// Backend for boards without I2C
///
/// `init` succeeds so that board bring-up code does not need to special
/// case it; every transfer fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoI2c;

impl I2cBackend for NoI2c {
    fn init(&mut self, _config: I2cConfig, _flags: u32) -> Result<(), I2cError> {
        Ok(())
    }

    fn read(&mut self, _address: u16, _buf: &mut [u8]) -> Result<(), I2cError> {
        Err(I2cError::NoBackend)
    }

    fn write(&mut self, _address: u16, _data: &[u8]) -> Result<(), I2cError> {
        Err(I2cError::NoBackend)
    }

    fn write_read(&mut self, _address: u16, _data: &[u8], _buf: &mut [u8]) -> Result<(), I2cError> {
        Err(I2cError::NoBackend)
    }
}

/// Adapter from an `embedded_hal` 7-bit I2C bus
///
/// The wrapped bus is expected to be clocked already, so `init` only
/// records the requested configuration.
pub struct EmbeddedHalI2c<T> {
    bus: T,
    config: I2cConfig,
}

impl<T: I2c> EmbeddedHalI2c<T> {
    pub fn new(bus: T) -> Self {
        Self {
            bus,
            config: I2cConfig::default(),
        }
    }

    /// Configuration passed to the last `init`
    pub fn config(&self) -> I2cConfig {
        self.config
    }

    /// Give the wrapped bus back
    pub fn release(self) -> T {
        self.bus
    }
}

fn seven_bit(address: u16) -> Result<u8, I2cError> {
    u8::try_from(address)
        .ok()
        .filter(|a| *a <= 0x7F)
        .ok_or(I2cError::Address(address))
}

impl<T: I2c> I2cBackend for EmbeddedHalI2c<T> {
    fn init(&mut self, config: I2cConfig, _flags: u32) -> Result<(), I2cError> {
        self.config = config;
        Ok(())
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), I2cError> {
        let address = seven_bit(address)?;
        self.bus
            .read(address, buf)
            .map_err(|e| I2cError::Bus(e.kind()))
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), I2cError> {
        let address = seven_bit(address)?;
        self.bus
            .write(address, data)
            .map_err(|e| I2cError::Bus(e.kind()))
    }

    fn write_read(&mut self, address: u16, data: &[u8], buf: &mut [u8]) -> Result<(), I2cError> {
        let address = seven_bit(address)?;
        self.bus
            .write_read(address, data, buf)
            .map_err(|e| I2cError::Bus(e.kind()))
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };
}
