//! Command set and dispatcher trait
//!
//! Every request a caller can make is one [`Command`] variant carrying its
//! own typed arguments. A chip driver implements [`Invoke`] and answers
//! with a [`Response`] or a [`HalError`]. [`Invoke::invoke_code`] folds
//! both into the numeric return convention: zero or positive on success,
//! the error's code otherwise.

use crate::adc::AdcCtrl;
use crate::dma::{DmaCtrl, DmaEndpoint, DmaFlags};
use crate::error::HalError;
use crate::gpio::{ExtiFlag, GpioFlags, PortReg};
use crate::i2c::I2cConfig;
use crate::pwm::PwmCtrl;
use crate::spi::{Mode, SpiBusFlags};
use crate::uart::UsartFlags;

/// Numeric command ids
///
/// Ids are grouped by peripheral in blocks of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum InvokeId {
    SystemInit = 100,

    LlDrvInit = 200,
    DelayNano = 201,
    LogPuts = 202,

    GpioInit = 300,
    GpioSet = 301,
    GpioGetInput = 302,
    GpioGetOutput = 303,
    GpioGetPortReg = 304,
    GpioExti = 305,

    SpiInit = 400,
    SpiDeinit = 401,
    SpiBlockingRw = 402,

    UsartInit = 500,
    UsartDeinit = 501,
    UsartWrite = 502,

    PwmInit = 600,
    PwmDeinit = 601,
    PwmCtrl = 602,

    AdcInit = 700,
    AdcDeinit = 701,
    AdcCtrl = 702,

    DmaInit = 800,
    DmaDeinit = 801,
    DmaCtrl = 802,

    I2cInit = 900,
    I2cRead = 901,
    I2cWrite = 902,
    I2cWriteRead = 903,
}

impl TryFrom<u32> for InvokeId {
    type Error = HalError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        use InvokeId::*;
        Ok(match id {
            100 => SystemInit,
            200 => LlDrvInit,
            201 => DelayNano,
            202 => LogPuts,
            300 => GpioInit,
            301 => GpioSet,
            302 => GpioGetInput,
            303 => GpioGetOutput,
            304 => GpioGetPortReg,
            305 => GpioExti,
            400 => SpiInit,
            401 => SpiDeinit,
            402 => SpiBlockingRw,
            500 => UsartInit,
            501 => UsartDeinit,
            502 => UsartWrite,
            600 => PwmInit,
            601 => PwmDeinit,
            602 => PwmCtrl,
            700 => AdcInit,
            701 => AdcDeinit,
            702 => AdcCtrl,
            800 => DmaInit,
            801 => DmaDeinit,
            802 => DmaCtrl,
            900 => I2cInit,
            901 => I2cRead,
            902 => I2cWrite,
            903 => I2cWriteRead,
            _ => return Err(HalError::UnknownCommand),
        })
    }
}

/// A request to the chip driver
#[derive(Debug)]
pub enum Command<'a> {
    /// Clock tree bring-up; startup code has normally done it already
    SystemInit,
    /// Peripheral clocks, SysTick and the log port
    LlDrvInit,
    /// Busy-wait for at least this many nanoseconds
    DelayNanos(u32),
    /// Write raw bytes to the log port
    LogPuts(&'a [u8]),

    GpioInit {
        port: u32,
        pin: u32,
        flags: GpioFlags,
    },
    GpioSet {
        port: u32,
        pin: u32,
        level: bool,
    },
    GpioGetInput {
        port: u32,
        pin: u32,
    },
    GpioGetOutput {
        port: u32,
        pin: u32,
    },
    GpioGetPortReg {
        port: u32,
    },
    GpioExti {
        port: u32,
        pin: u32,
        flag: ExtiFlag,
    },

    SpiInit {
        bus: u32,
        mode: Mode,
        flags: SpiBusFlags,
        baudrate: u32,
    },
    SpiDeinit {
        bus: u32,
    },
    /// Full-duplex transfer over `max(write.len(), read.len())` bytes
    SpiTransfer {
        bus: u32,
        write: Option<&'a [u8]>,
        read: Option<&'a mut [u8]>,
    },

    UsartInit {
        usart: u32,
        flags: UsartFlags,
        baudrate: u32,
    },
    UsartDeinit {
        usart: u32,
    },
    UsartWrite {
        usart: u32,
        data: &'a [u8],
    },

    PwmInit {
        channel: u32,
        freq_hz: u32,
    },
    PwmDeinit {
        channel: u32,
    },
    PwmCtrl {
        channel: u32,
        ctrl: PwmCtrl,
    },

    AdcInit {
        channel: u32,
        flags: u32,
    },
    AdcDeinit {
        channel: u32,
    },
    AdcCtrl {
        channel: u32,
        ctrl: AdcCtrl<'a>,
    },

    DmaInit {
        channel: u32,
        src: DmaEndpoint,
        dst: DmaEndpoint,
        flags: DmaFlags,
        extra_flags: u32,
    },
    DmaDeinit {
        channel: u32,
    },
    DmaCtrl {
        channel: u32,
        ctrl: DmaCtrl,
    },

    I2cInit {
        bus: u32,
        config: I2cConfig,
        flags: u32,
    },
    I2cRead {
        bus: u32,
        addr_bits: u8,
        address: u16,
        buf: &'a mut [u8],
    },
    I2cWrite {
        bus: u32,
        addr_bits: u8,
        address: u16,
        data: &'a [u8],
    },
    I2cWriteRead {
        bus: u32,
        addr_bits: u8,
        address: u16,
        data: &'a [u8],
        buf: &'a mut [u8],
    },
}

impl Command<'_> {
    /// Numeric id of this command
    pub fn id(&self) -> InvokeId {
        match self {
            Command::SystemInit => InvokeId::SystemInit,
            Command::LlDrvInit => InvokeId::LlDrvInit,
            Command::DelayNanos(_) => InvokeId::DelayNano,
            Command::LogPuts(_) => InvokeId::LogPuts,
            Command::GpioInit { .. } => InvokeId::GpioInit,
            Command::GpioSet { .. } => InvokeId::GpioSet,
            Command::GpioGetInput { .. } => InvokeId::GpioGetInput,
            Command::GpioGetOutput { .. } => InvokeId::GpioGetOutput,
            Command::GpioGetPortReg { .. } => InvokeId::GpioGetPortReg,
            Command::GpioExti { .. } => InvokeId::GpioExti,
            Command::SpiInit { .. } => InvokeId::SpiInit,
            Command::SpiDeinit { .. } => InvokeId::SpiDeinit,
            Command::SpiTransfer { .. } => InvokeId::SpiBlockingRw,
            Command::UsartInit { .. } => InvokeId::UsartInit,
            Command::UsartDeinit { .. } => InvokeId::UsartDeinit,
            Command::UsartWrite { .. } => InvokeId::UsartWrite,
            Command::PwmInit { .. } => InvokeId::PwmInit,
            Command::PwmDeinit { .. } => InvokeId::PwmDeinit,
            Command::PwmCtrl { .. } => InvokeId::PwmCtrl,
            Command::AdcInit { .. } => InvokeId::AdcInit,
            Command::AdcDeinit { .. } => InvokeId::AdcDeinit,
            Command::AdcCtrl { .. } => InvokeId::AdcCtrl,
            Command::DmaInit { .. } => InvokeId::DmaInit,
            Command::DmaDeinit { .. } => InvokeId::DmaDeinit,
            Command::DmaCtrl { .. } => InvokeId::DmaCtrl,
            Command::I2cInit { .. } => InvokeId::I2cInit,
            Command::I2cRead { .. } => InvokeId::I2cRead,
            Command::I2cWrite { .. } => InvokeId::I2cWrite,
            Command::I2cWriteRead { .. } => InvokeId::I2cWriteRead,
        }
    }
}

/// Successful result of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Nothing to report
    Done,
    /// Pin level
    Level(bool),
    /// Register pointers of a GPIO port
    PortReg(PortReg),
    /// Duty or period in timer ticks
    Value(u32),
}

impl Response {
    /// Numeric success value
    pub fn code(&self) -> i32 {
        match self {
            Response::Done | Response::PortReg(_) => 0,
            Response::Level(level) => i32::from(*level),
            Response::Value(v) => i32::try_from(*v).unwrap_or(i32::MAX),
        }
    }
}

/// Command dispatcher implemented by each chip driver
pub trait Invoke {
    /// Execute one command
    ///
    /// Commands the chip does not implement fail with
    /// [`HalError::UnknownCommand`] and touch no register.
    fn invoke(&mut self, cmd: Command<'_>) -> Result<Response, HalError>;

    /// Execute one command and return the numeric result
    fn invoke_code(&mut self, cmd: Command<'_>) -> i32 {
        match self.invoke(cmd) {
            Ok(response) => response.code(),
            Err(e) => e.code(),
        }
    }
}
