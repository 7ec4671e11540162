//! Driver for AT24C32 I2C EEPROM chips.

use crate::{Config, Error, Framing, Read, Timing, Transport, Write, WriteProtect};
use core::cmp;
use core::fmt;
use embedded_hal::blocking::delay::DelayMs;

/// 7-bit bus address of an AT24C32 with `A2..A0` tied low.
pub const BASE_ADDRESS: u8 = 0x50;

/// Highest hardware address selectable via the `A2..A0` pins.
pub const MAX_HARDWARE_ADDRESS: u8 = 0b111;

/// Memory size in bytes.
pub const SIZE: u16 = 4096;

/// Size of a write page in bytes. Pages start at multiples of this.
pub const PAGE_SIZE: u16 = 32;

/// Maximum number of bytes accepted by one [`Write::write_bytes`] call.
pub const MAX_WRITE_LEN: usize = 253;

/// Number of memory address bytes sent ahead of every access.
const ADDR_LEN: usize = 2;

/// Room for the memory address followed by one full page.
const SCRATCH_LEN: usize = ADDR_LEN + PAGE_SIZE as usize;

/// Driver for AT24C32 EEPROM chips.
///
/// # Type Parameters
///
/// * **`B`**: The bus the chip is attached to. Pass `&mut bus` to keep using
///   the bus for other devices while the driver exists.
/// * **`WP`**: The line attached to the `WP` pin of the chip, or
///   [`NoWriteProtect`] if it is not controlled by the MCU.
/// * **`D`**: Blocking delay provider, used to wait for write cycles.
///
/// [`NoWriteProtect`]: crate::NoWriteProtect
pub struct Eeprom<B, WP, D> {
    bus: B,
    wp: WP,
    delay: D,
    timing: Timing,
    hardware_address: u8,
    /// 7-bit bus address derived from `hardware_address`.
    address: u8,
    /// Payload assembly area, contents are garbage between calls.
    buf: [u8; SCRATCH_LEN],
}

impl<B: fmt::Debug, WP: fmt::Debug, D> fmt::Debug for Eeprom<B, WP, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eeprom")
            .field("bus", &self.bus)
            .field("wp", &self.wp)
            .field("timing", &self.timing)
            .field("address", &format_args!("{:#04x}", self.address))
            .finish()
    }
}

impl<B, WP, D> Eeprom<B, WP, D>
where
    B: Transport,
    WP: WriteProtect,
    D: DelayMs<u8>,
{
    /// Creates a new AT24C32 driver.
    ///
    /// No bus traffic is generated. Write protection is enabled before this
    /// returns.
    ///
    /// # Parameters
    ///
    /// * **`bus`**: The bus the chip is attached to.
    /// * **`wp`**: The `WP` line of the chip. Must already be configured as an
    ///   output.
    /// * **`delay`**: Delay provider.
    /// * **`config`**: Hardware address and timings. A hardware address above
    ///   7 is treated as 7.
    pub fn init(bus: B, wp: WP, delay: D, config: Config) -> Result<Self, Error<B, WP>> {
        let hardware_address = if config.hardware_address > MAX_HARDWARE_ADDRESS {
            warn!(
                "Eeprom::init: hardware address {} out of range, using {}",
                config.hardware_address,
                MAX_HARDWARE_ADDRESS
            );
            MAX_HARDWARE_ADDRESS
        } else {
            config.hardware_address
        };

        let mut this = Self {
            bus,
            wp,
            delay,
            timing: config.timing,
            hardware_address,
            address: BASE_ADDRESS | hardware_address,
            buf: [0; SCRATCH_LEN],
        };
        info!("Eeprom::init: bus address = {:#04x}", this.address);

        this.protect()?;
        Ok(this)
    }

    /// Returns the hardware address in use, after clamping.
    pub fn hardware_address(&self) -> u8 {
        self.hardware_address
    }

    /// Returns the 7-bit bus address of the chip.
    pub fn bus_address(&self) -> u8 {
        self.address
    }

    /// Returns the bus, write-protect line and delay provider.
    ///
    /// The write-protect line is left asserted.
    pub fn free(self) -> (B, WP, D) {
        (self.bus, self.wp, self.delay)
    }

    fn protect(&mut self) -> Result<(), Error<B, WP>> {
        self.wp
            .protect(&mut self.delay, &self.timing)
            .map_err(Error::Gpio)
    }

    /// Makes the chip writable. If the line can't be released it is driven
    /// back to protected, and the release error is returned.
    fn release(&mut self) -> Result<(), Error<B, WP>> {
        if let Err(e) = self.wp.release(&mut self.delay, &self.timing) {
            warn!("Eeprom::release: WP could not be released");
            let _ = self.protect();
            return Err(Error::Gpio(e));
        }
        Ok(())
    }

    /// Writes a single byte.
    ///
    /// Blocks for the chip's write cycle time before returning. Write
    /// protection is restored even if the write fails.
    pub fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), Error<B, WP>> {
        self.release()?;

        self.buf[..ADDR_LEN].copy_from_slice(&addr.to_be_bytes());
        self.buf[ADDR_LEN] = data;
        trace!("Eeprom::write_byte: {:#06x} <- {:#04x}", addr, data);
        let result = self
            .bus
            .write(self.address, &self.buf[..ADDR_LEN + 1], Framing::Stop)
            .map_err(Error::Bus);
        self.delay.delay_ms(self.timing.write_cycle_ms);

        // If the bus transfer fails, make sure to protect the chip anyways
        let protect_result = self.protect();
        result?;
        protect_result
    }

    /// Programs `data` page by page, stopping at the first failed page.
    fn write_pages(&mut self, addr: u16, data: &[u8]) -> Result<(), Error<B, WP>> {
        let mut current_addr = addr;
        let mut written = 0;

        while written < data.len() {
            // The chip wraps around within a page, so never write past its end
            let page_end = (current_addr & !(PAGE_SIZE - 1)) + (PAGE_SIZE - 1);
            let page_remaining = usize::from(page_end - current_addr) + 1;
            let chunk_len = cmp::min(data.len() - written, page_remaining);
            let chunk = &data[written..written + chunk_len];

            self.buf[..ADDR_LEN].copy_from_slice(&current_addr.to_be_bytes());
            self.buf[ADDR_LEN..ADDR_LEN + chunk_len].copy_from_slice(chunk);
            debug!(
                "Eeprom::write_pages: {} bytes at {:#06x}",
                chunk_len,
                current_addr
            );
            trace!("Eeprom::write_pages: {:?}", crate::log::Hex(chunk));

            if let Err(e) = self.bus.write(
                self.address,
                &self.buf[..ADDR_LEN + chunk_len],
                Framing::Stop,
            ) {
                warn!(
                    "Eeprom::write_pages: write at {:#06x} failed, {} of {} bytes written",
                    current_addr,
                    written,
                    data.len()
                );
                return Err(Error::Bus(e));
            }

            current_addr = current_addr.wrapping_add(chunk_len as u16);
            written += chunk_len;
            self.delay.delay_ms(self.timing.write_cycle_ms);
        }

        Ok(())
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self, addr: u16) -> Result<u8, Error<B, WP>> {
        let mut byte = [0];
        self.read(addr, &mut byte)?;
        Ok(byte[0])
    }

    /// Reads a single byte, returning 0 if the read fails.
    ///
    /// A failed read can not be told apart from a stored zero. Prefer
    /// [`read_byte`](Self::read_byte).
    pub fn read_byte_or_zero(&mut self, addr: u16) -> u8 {
        self.read_byte(addr).unwrap_or(0)
    }
}

impl<B, WP, D> Read<u16, B, WP> for Eeprom<B, WP, D>
where
    B: Transport,
    WP: WriteProtect,
    D: DelayMs<u8>,
{
    /// Reads EEPROM contents into `buf`, starting at `addr`.
    ///
    /// Only the lowest 12 bits of `addr` are decoded by the chip, so the
    /// contents are mirrored every 4 KiB. Reads continue past the end of the
    /// memory at address 0.
    ///
    /// # Parameters
    ///
    /// * `addr`: Address to start reading at.
    /// * `buf`: Destination buffer to fill.
    fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), Error<B, WP>> {
        if buf.is_empty() {
            return Ok(());
        }

        // Set the chip's address pointer, then read from it without
        // releasing the bus in between
        self.buf[..ADDR_LEN].copy_from_slice(&addr.to_be_bytes());
        self.bus
            .write(self.address, &self.buf[..ADDR_LEN], Framing::NoStop)
            .map_err(Error::Bus)?;
        self.bus
            .read(self.address, buf, Framing::Stop)
            .map_err(Error::Bus)?;

        trace!("Eeprom::read: {:#06x}: {:?}", addr, crate::log::Hex(buf));
        Ok(())
    }
}

impl<B, WP, D> Write<u16, B, WP> for Eeprom<B, WP, D>
where
    B: Transport,
    WP: WriteProtect,
    D: DelayMs<u8>,
{
    /// Writes up to [`MAX_WRITE_LEN`] bytes starting at `addr`.
    ///
    /// The data is split so that no transaction crosses a page boundary, and
    /// the chip's write cycle is awaited after each page. If a page fails,
    /// no further pages are attempted and the pages before it stay written.
    /// Write protection is restored either way.
    ///
    /// Writing an empty slice does nothing.
    fn write_bytes(&mut self, addr: u16, data: &[u8]) -> Result<(), Error<B, WP>> {
        if data.len() > MAX_WRITE_LEN {
            return Err(Error::TooLong(data.len()));
        }
        if data.is_empty() {
            return Ok(());
        }

        self.release()?;
        let result = self.write_pages(addr, data);
        let protect_result = self.protect();
        result?;
        protect_result
    }
}
