//! [`Transport`] adapter for `embedded-hal` blocking I2C peripherals.

use crate::{Framing, Transport};
use embedded_hal::blocking::i2c;

/// Longest `NoStop` write that is held back to be merged with a following
/// read. Covers the 2-byte memory address of random reads.
const MAX_PENDING: usize = 2;

#[derive(Debug, Copy, Clone)]
struct Pending {
    address: u8,
    bytes: [u8; MAX_PENDING],
    len: usize,
}

impl Pending {
    fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Implements [`Transport`] on top of the `embedded-hal` blocking I2C traits.
///
/// `embedded-hal` has no way to leave a transaction open, so a short `NoStop`
/// write is buffered and sent together with the next read to the same
/// address as a single repeated-start `write_read`. Consequently a failing
/// address write is reported by that read.
///
/// `NoStop` writes that are too long to buffer, or that are followed by
/// something other than a read from the same device, are sent as plain
/// writes. The AT24C32 keeps its address pointer across a STOP, so the read
/// that follows still starts at the right place.
#[derive(Debug)]
pub struct I2cBus<I2C> {
    i2c: I2C,
    pending: Option<Pending>,
}

impl<I2C> I2cBus<I2C> {
    /// Wraps an I2C peripheral. Must be configured for a clock rate the
    /// device supports (100 or 400 kHz).
    pub fn new(i2c: I2C) -> Self {
        Self { i2c, pending: None }
    }

    /// Returns the I2C peripheral. A buffered `NoStop` write is discarded.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> I2cBus<I2C>
where
    I2C: i2c::Write<Error = E>,
{
    fn flush(&mut self) -> Result<(), E> {
        match self.pending.take() {
            Some(pending) => {
                trace!(
                    "I2cBus::flush: {:?}",
                    crate::log::Hex(pending.bytes())
                );
                self.i2c.write(pending.address, pending.bytes())
            }
            None => Ok(()),
        }
    }
}

impl<I2C, E> Transport for I2cBus<I2C>
where
    I2C: i2c::Write<Error = E> + i2c::Read<Error = E> + i2c::WriteRead<Error = E>,
{
    type Error = E;

    fn write(&mut self, address: u8, bytes: &[u8], framing: Framing) -> Result<(), E> {
        self.flush()?;

        if framing == Framing::NoStop && bytes.len() <= MAX_PENDING {
            let mut pending = Pending {
                address,
                bytes: [0; MAX_PENDING],
                len: bytes.len(),
            };
            pending.bytes[..bytes.len()].copy_from_slice(bytes);
            self.pending = Some(pending);
            return Ok(());
        }

        self.i2c.write(address, bytes)
    }

    fn read(&mut self, address: u8, buf: &mut [u8], _framing: Framing) -> Result<(), E> {
        match self.pending.take() {
            Some(pending) if pending.address == address => {
                self.i2c.write_read(address, pending.bytes(), buf)
            }
            pending => {
                self.pending = pending;
                self.flush()?;
                self.i2c.read(address, buf)
            }
        }
    }
}
