//! llbind Hardware Abstraction Layer
//!
//! Chip-independent half of the llbind binding layer. It defines what a
//! caller can ask of a microcontroller ([`Command`]), how the answer comes
//! back ([`Response`], [`HalError`]) and how interrupts hand data to the
//! foreground ([`EventQueue`]). The chip crates implement [`Invoke`] on top
//! of a [`RegisterBus`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / runtime                  │
//! └─────────────────────────────────────────┘
//!           │ Command               ▲ Event
//!           ▼                       │
//! ┌─────────────────────────────────────────┐
//! │  llbind-hal (this crate - types)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  llbind-hal-  │       │  llbind-hal-  │
//! │   ch32v20x    │       │   hk32f0301   │
//! └───────────────┘       └───────────────┘
//!         │                       │
//!         └───────────┬───────────┘
//!                     ▼
//!        RegisterBus (Mmio or simulator)
//! ```
//!
//! # Modules
//!
//! - [`command`] - command set and the [`Invoke`] dispatcher trait
//! - [`error`] - [`HalError`] and its numeric codes
//! - [`bus`] - [`RegisterBus`] and the volatile [`Mmio`] backend
//! - [`table`] - index to descriptor tables
//! - [`event`] - interrupt event queue
//! - [`gpio`], [`spi`], [`uart`], [`i2c`], [`adc`], [`dma`], [`pwm`] -
//!   per-peripheral flag words and control codes

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod bus;
pub mod command;
pub mod dma;
pub mod error;
pub mod event;
pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod spi;
pub mod table;
pub mod uart;

// Re-export key types at crate root for convenience
pub use bus::{Mmio, RegisterBus};
pub use command::{Command, Invoke, InvokeId, Response};
pub use error::HalError;
pub use event::{Event, EventQueue};
pub use gpio::{ExtiFlag, GpioFlags, PinMode, PortReg};
pub use i2c::{EmbeddedHalI2c, I2cBackend, I2cError, NoI2c};
pub use table::PeripheralTable;
