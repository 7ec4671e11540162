//! Logging macros that forward to the `log` crate when the `log` feature is
//! enabled, and expand to nothing otherwise.

#![allow(unused_macros)]

use core::fmt;

macro_rules! trace {
    ($($arg:expr),* $(,)?) => {
        #[cfg(feature = "log")]
        ::log::trace!($($arg),*);
    };
}

macro_rules! debug {
    ($($arg:expr),* $(,)?) => {
        #[cfg(feature = "log")]
        ::log::debug!($($arg),*);
    };
}

macro_rules! info {
    ($($arg:expr),* $(,)?) => {
        #[cfg(feature = "log")]
        ::log::info!($($arg),*);
    };
}

macro_rules! warn {
    ($($arg:expr),* $(,)?) => {
        #[cfg(feature = "log")]
        ::log::warn!($($arg),*);
    };
}

/// Bus payload in `trace!` output, printed as `[00, 1f, a0]`.
#[cfg_attr(not(feature = "log"), allow(dead_code))]
pub(crate) struct Hex<'a>(pub &'a [u8]);

impl fmt::Debug for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = self.0.iter();
        f.write_str("[")?;
        if let Some(first) = bytes.next() {
            write!(f, "{:02x}", first)?;
            for byte in bytes {
                write!(f, ", {:02x}", byte)?;
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::Hex;

    #[test]
    fn hex_payload() {
        assert_eq!(format!("{:?}", Hex(&[0x00, 0x1f, 0xa0])), "[00, 1f, a0]");
        assert_eq!(format!("{:?}", Hex(&[0x05])), "[05]");
        assert_eq!(format!("{:?}", Hex(&[])), "[]");
    }
}
