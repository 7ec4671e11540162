//! An [`embedded-hal`]-based driver for AT24C32 I2C EEPROM chips.
//!
//! The AT24C32 stores 4 KiB organized in 32-byte pages. Up to 8 chips can
//! share one I2C bus, selected by strapping their `A2..A0` pins. The driver
//! splits arbitrary writes into page-sized transactions (the chip silently
//! wraps writes that cross a page boundary) and optionally drives the
//! chip's `WP` pin so that the memory is only writable while the driver is
//! actually writing.
//!
//! Any I2C peripheral implementing the `embedded-hal` blocking I2C traits can
//! be used through [`I2cBus`]. Custom buses can implement [`Transport`]
//! directly.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/

#![doc(html_root_url = "https://docs.rs/at24c32/0.1.0")]
#![warn(missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;
pub mod at24c32;
mod bus;
mod config;
mod error;
pub mod prelude;
pub mod write_protect;

pub use crate::at24c32::Eeprom;
pub use crate::bus::I2cBus;
pub use crate::config::{Config, Timing};
pub use crate::error::Error;
pub use crate::write_protect::{NoWriteProtect, WriteProtect};

/// How a bus transaction ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Framing {
    /// Generate a STOP condition, releasing the bus.
    Stop,
    /// Keep the bus, so that the next transaction to the same device follows
    /// with a repeated START.
    NoStop,
}

/// An addressed two-wire bus.
///
/// Addresses are 7-bit device addresses; the R/W bit is added by the
/// implementation.
pub trait Transport {
    /// Error reported by a failed transaction.
    type Error;

    /// Writes `bytes` to the device at `address`.
    fn write(&mut self, address: u8, bytes: &[u8], framing: Framing) -> Result<(), Self::Error>;

    /// Reads `buf.len()` bytes from the device at `address`.
    fn read(&mut self, address: u8, buf: &mut [u8], framing: Framing) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, bytes: &[u8], framing: Framing) -> Result<(), Self::Error> {
        T::write(self, address, bytes, framing)
    }

    fn read(&mut self, address: u8, buf: &mut [u8], framing: Framing) -> Result<(), Self::Error> {
        T::read(self, address, buf, framing)
    }
}

/// A trait for reading operations from a memory chip.
pub trait Read<Addr, B: Transport, WP: WriteProtect> {
    /// Reads bytes from a memory chip.
    ///
    /// # Parameters
    /// * `addr`: The address to start reading at.
    /// * `buf`: The buffer to read `buf.len()` bytes into.
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error<B, WP>>;
}

/// A trait for writing operations on a memory chip.
pub trait Write<Addr, B: Transport, WP: WriteProtect> {
    /// Writes bytes onto the memory chip.
    ///
    /// # Parameters
    /// * `addr`: The address to write to.
    /// * `data`: The bytes to write to `addr`.
    fn write_bytes(&mut self, addr: Addr, data: &[u8]) -> Result<(), Error<B, WP>>;
}
