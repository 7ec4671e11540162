//! Control of the chip's `WP` pin.
//!
//! While `WP` is high the AT24C32 ignores writes. The driver keeps the pin
//! high except while it is writing.

use crate::Timing;
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

/// Something that can enable and disable the chip's hardware write
/// protection.
///
/// Implemented for every [`OutputPin`] connected to `WP`, and for
/// [`NoWriteProtect`] when the pin is hardwired.
pub trait WriteProtect {
    /// Error reported when the line cannot be driven.
    type Error;

    /// Makes the memory read-only.
    fn protect<D: DelayMs<u8>>(&mut self, delay: &mut D, timing: &Timing)
        -> Result<(), Self::Error>;

    /// Makes the memory writable.
    fn release<D: DelayMs<u8>>(&mut self, delay: &mut D, timing: &Timing)
        -> Result<(), Self::Error>;
}

impl<P: OutputPin> WriteProtect for P {
    type Error = P::Error;

    fn protect<D: DelayMs<u8>>(&mut self, delay: &mut D, timing: &Timing) -> Result<(), P::Error> {
        delay.delay_ms(timing.wp_setup_ms);
        self.set_high()?;
        // Let the level settle before the next bus access.
        delay.delay_ms(timing.wp_hold_ms);
        Ok(())
    }

    fn release<D: DelayMs<u8>>(&mut self, delay: &mut D, timing: &Timing) -> Result<(), P::Error> {
        self.set_low()?;
        delay.delay_ms(timing.wp_release_ms);
        Ok(())
    }
}

/// Stand-in for the `WP` pin when it is hardwired and not controlled by the
/// MCU.
///
/// Protecting and releasing do nothing, don't wait, and never fail.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NoWriteProtect;

impl WriteProtect for NoWriteProtect {
    type Error = Infallible;

    fn protect<D: DelayMs<u8>>(&mut self, _: &mut D, _: &Timing) -> Result<(), Infallible> {
        Ok(())
    }

    fn release<D: DelayMs<u8>>(&mut self, _: &mut D, _: &Timing) -> Result<(), Infallible> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    #[derive(Debug, PartialEq)]
    enum Event {
        High,
        Low,
        Delay(u8),
    }

    struct Pin<'a>(&'a RefCell<Vec<Event>>);

    impl OutputPin for Pin<'_> {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Event::Low);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Event::High);
            Ok(())
        }
    }

    struct Delay<'a>(&'a RefCell<Vec<Event>>);

    impl DelayMs<u8> for Delay<'_> {
        fn delay_ms(&mut self, ms: u8) {
            self.0.borrow_mut().push(Event::Delay(ms));
        }
    }

    #[test]
    fn pin_protect_and_release() {
        let events = RefCell::new(Vec::new());
        let mut pin = Pin(&events);
        let mut delay = Delay(&events);
        let timing = Timing::default();

        pin.release(&mut delay, &timing).unwrap();
        pin.protect(&mut delay, &timing).unwrap();
        assert_eq!(
            events.into_inner(),
            vec![
                Event::Low,
                Event::Delay(1),
                Event::Delay(1),
                Event::High,
                Event::Delay(2),
            ]
        );
    }

    #[test]
    fn no_write_protect_does_not_wait() {
        let events = RefCell::new(Vec::new());
        let mut delay = Delay(&events);
        let timing = Timing::default();

        NoWriteProtect.release(&mut delay, &timing).unwrap();
        NoWriteProtect.protect(&mut delay, &timing).unwrap();
        assert!(events.into_inner().is_empty());
    }
}
