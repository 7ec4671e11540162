use crate::{Transport, WriteProtect};
use core::fmt::{self, Debug, Display};

mod private {
    #[derive(Debug)]
    pub enum Private {}
}

/// The error type used by this library.
///
/// This can encapsulate a bus or GPIO error, and adds its own usage errors on
/// top of that.
pub enum Error<B: Transport, WP: WriteProtect> {
    /// A bus transaction failed.
    ///
    /// The transport does not tell a NACK from a timeout or lost arbitration;
    /// its error value is passed through as-is.
    Bus(B::Error),

    /// The write-protect line could not be set.
    Gpio(WP::Error),

    /// A paged write was given more bytes than a single call supports.
    ///
    /// Contains the length of the rejected data.
    TooLong(usize),

    #[doc(hidden)]
    __NonExhaustive(private::Private),
}

impl<B: Transport, WP: WriteProtect> Debug for Error<B, WP>
where
    B::Error: Debug,
    WP::Error: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(bus) => write!(f, "Error::Bus({:?})", bus),
            Error::Gpio(gpio) => write!(f, "Error::Gpio({:?})", gpio),
            Error::TooLong(len) => write!(f, "Error::TooLong({})", len),
            Error::__NonExhaustive(_) => unreachable!(),
        }
    }
}

impl<B: Transport, WP: WriteProtect> Display for Error<B, WP>
where
    B::Error: Display,
    WP::Error: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(bus) => write!(f, "bus error: {}", bus),
            Error::Gpio(gpio) => write!(f, "GPIO error: {}", gpio),
            Error::TooLong(len) => write!(
                f,
                "write of {} bytes exceeds the maximum of {} bytes",
                len,
                crate::at24c32::MAX_WRITE_LEN
            ),
            Error::__NonExhaustive(_) => unreachable!(),
        }
    }
}
