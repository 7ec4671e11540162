//! Command line tool for AT24C32 EEPROMs on Linux I2C buses.

use std::fmt::Debug;

use log::{info, error};

use structopt::StructOpt;

pub use linux_embedded_hal::sysfs_gpio::Direction;
pub use linux_embedded_hal::{Delay, I2cdev, Pin as Pindev};

use simplelog::{TermLogger, LevelFilter, TerminalMode};

use ihex::{Record, Reader};

use at24c32::prelude::*;
use at24c32::at24c32::{MAX_WRITE_LEN, PAGE_SIZE, SIZE};
use at24c32::{Config, Eeprom, I2cBus, NoWriteProtect, WriteProtect};

type Error = Box<dyn std::error::Error>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, StructOpt)]
struct Options {
    #[structopt(subcommand)]
    operation: Operations,

    /// I2C device
    #[structopt(long, default_value="/dev/i2c-1", env = "I2C_DEV")]
    i2c_dev: String,

    /// Hardware address set by the A2..A0 pins (0-7)
    #[structopt(long, default_value = "0", env = "EEPROM_HW_ADDR")]
    hw_addr: u8,

    /// Write protect (output) pin, leave out if WP is hardwired
    #[structopt(long, env = "WP_PIN")]
    wp_pin: Option<u64>,

    /// Configure log level
    #[structopt(long, default_value = "info", env="LOG_LEVEL")]
    log_level: LevelFilter,
}

#[derive(Debug, PartialEq, StructOpt)]
pub enum Operations {
    /// Show device information
    Info,
    /// Read data from the device
    Read {
        /// EEPROM address for read start in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: u16,
        /// Length of read in bytes
        #[structopt()]
        length: u16,
    },
    /// Read a single byte
    ReadByte {
        /// EEPROM address in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: u16,
    },
    /// Write data starting at the specified address
    Write {
        /// EEPROM address for write start in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: u16,

        // Data to write in hexadecimal
        #[structopt(long)]
        data: HexData,
    },
    /// Write a single byte
    WriteByte {
        /// EEPROM address in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: u16,

        /// Value in hex
        #[structopt(parse(try_from_str = parse_hex_byte))]
        value: u8,
    },
    /// Dump EEPROM contents into a hex file
    Dump {
        /// EEPROM address for read start in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: u16,

        /// Length of read in bytes
        #[structopt()]
        length: u16,

        /// Output ihex file
        #[structopt(long, default_value="dump.ihex")]
        file: String,
    },
    /// Load EEPROM contents from a hex file
    Load {
        /// Input ihex file
        file: String,
    },
}

#[derive(Debug, PartialEq)]
pub struct HexData(Vec<u8>);

impl std::str::FromStr for HexData {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        hex::decode(s).map(HexData)
    }
}

fn parse_hex(s: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s, 16)
}

fn parse_hex_byte(s: &str) -> std::result::Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(s, 16)
}

trait ResultExt<T, E> {
    fn dbg_err(self, msg: &str) -> std::result::Result<T, Error>;
}

impl<T, E: Debug> ResultExt<T, E> for std::result::Result<T, E> {
    fn dbg_err(self, msg: &str) -> std::result::Result<T, Error> {
        self.map_err(|e| format!("{}: {:?}", msg, e).into())
    }
}

fn main() -> Result<()> {
    // Load options
    let opts = Options::from_args();

    // Setup logging
    TermLogger::init(opts.log_level, simplelog::Config::default(), TerminalMode::Mixed)
        .dbg_err("logger init")?;

    // Connect I2C device
    let i2c = I2cdev::new(&opts.i2c_dev)?;
    let bus = I2cBus::new(i2c);

    let config = Config::default().with_hardware_address(opts.hw_addr);

    match opts.wp_pin {
        Some(wp_pin) => {
            // Connect and configure GPIO pin
            let wp = Pindev::new(wp_pin);
            wp.export()?;
            wp.set_direction(Direction::Out)?;

            let eeprom = Eeprom::init(bus, wp, Delay, config).dbg_err("eeprom init")?;
            run(eeprom, &opts.operation)
        }
        None => {
            let eeprom = Eeprom::init(bus, NoWriteProtect, Delay, config).dbg_err("eeprom init")?;
            run(eeprom, &opts.operation)
        }
    }
}

/// Performs the requested operation. Works with or without a WP pin.
fn run<WP>(mut eeprom: Eeprom<I2cBus<I2cdev>, WP, Delay>, operation: &Operations) -> Result<()>
where
    WP: WriteProtect,
    WP::Error: Debug,
{
    match operation {
        Operations::Info => {
            info!(
                "AT24C32 at bus address 0x{:02x} (hardware address {})",
                eeprom.bus_address(),
                eeprom.hardware_address()
            );
            info!("{} bytes, {} byte pages", SIZE, PAGE_SIZE);
        },
        Operations::Read{address, length} => {
            info!("Reading {} bytes from address 0x{:04x}", length, address);

            let mut buff = vec![0u8; *length as usize];
            eeprom.read(*address, &mut buff).dbg_err("read")?;

            info!("Read: {:02x?}", buff);
        },
        Operations::ReadByte{address} => {
            let value = eeprom.read_byte(*address).dbg_err("read byte")?;

            info!("0x{:04x}: 0x{:02x}", address, value);
        },
        Operations::Write{address, data} => {
            info!("Writing {} bytes to address 0x{:04x}", data.0.len(), address);

            write_all(&mut eeprom, *address, &data.0)?;

            info!("Write complete");
        },
        Operations::WriteByte{address, value} => {
            info!("Writing 0x{:02x} to address 0x{:04x}", value, address);

            eeprom.write_byte(*address, *value).dbg_err("write byte")?;

            info!("Write complete");
        },
        Operations::Dump{address, length, file} => {
            info!("Reading {} bytes from address 0x{:04x} to file {}", length, address, &file);

            let mut buff = vec![0u8; *length as usize];
            eeprom.read(*address, &mut buff).dbg_err("read")?;

            let mut records = Vec::new();
            for (c, chunk) in buff.chunks(PAGE_SIZE as usize).enumerate() {
                records.push(Record::Data{ offset: address.wrapping_add((c * PAGE_SIZE as usize) as u16), value: chunk.to_vec() });
            }
            records.push(Record::EndOfFile);

            let data = ihex::create_object_file_representation(&records).dbg_err("ihex")?;

            std::fs::write(file, data)?;

            info!("Dump complete");
        },
        Operations::Load{file} => {
            info!("Loading file {}", file);

            let data = std::fs::read_to_string(&file)?;

            let reader = Reader::new(&data);

            for record in reader {
                match record {
                    Ok(Record::Data{offset, value}) => {
                        info!("Writing {} bytes at address 0x{:04x}", value.len(), offset);
                        write_all(&mut eeprom, offset, &value)?;
                    },
                    Ok(Record::EndOfFile) => (),
                    Err(e) => {
                        error!("Reader error: {:?}", e);
                        return Err(format!("{:?}", e).into());
                    }
                    _ => {
                        error!("Unrecognised record: {:?}", record);
                        return Err("unrecognised ihex record".into());
                    }
                }
            }

            info!("Load complete");
        },
    }

    Ok(())
}

/// Writes `data` in pieces a single paged write accepts.
fn write_all<WP>(eeprom: &mut Eeprom<I2cBus<I2cdev>, WP, Delay>, address: u16, data: &[u8]) -> Result<()>
where
    WP: WriteProtect,
    WP::Error: Debug,
{
    for (c, chunk) in data.chunks(MAX_WRITE_LEN).enumerate() {
        let chunk_addr = address.wrapping_add((c * MAX_WRITE_LEN) as u16);
        eeprom.write_bytes(chunk_addr, chunk).dbg_err("write")?;
    }
    Ok(())
}
