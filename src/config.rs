/// Blocking delays used around write operations, in milliseconds.
///
/// The defaults are safe for the AT24C32 and its clones. Chips with a faster
/// write cycle can use shorter values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timing {
    /// Time to wait after each write transaction, allowing the chip to finish
    /// its internal write cycle (`tWR`).
    pub write_cycle_ms: u8,
    /// Time to wait before asserting `WP` after a write.
    pub wp_setup_ms: u8,
    /// Time to wait after asserting `WP` so the level is stable.
    pub wp_hold_ms: u8,
    /// Time to wait after deasserting `WP` before writing.
    pub wp_release_ms: u8,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            write_cycle_ms: 5,
            wp_setup_ms: 1,
            wp_hold_ms: 2,
            wp_release_ms: 1,
        }
    }
}

/// Driver configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Value of the `A2..A0` address pins (0-7).
    ///
    /// Out-of-range values are clamped to 7 by [`Eeprom::init`].
    ///
    /// [`Eeprom::init`]: crate::Eeprom::init
    pub hardware_address: u8,
    /// Delays applied around writes.
    pub timing: Timing,
}

impl Config {
    /// Sets the hardware address selected by the `A2..A0` pins.
    pub fn with_hardware_address(mut self, hardware_address: u8) -> Self {
        self.hardware_address = hardware_address;
        self
    }

    /// Sets the write timings.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.hardware_address, 0);
        assert_eq!(config.timing.write_cycle_ms, 5);
        assert_eq!(config.timing.wp_hold_ms, 2);
    }

    #[test]
    fn builder() {
        let timing = Timing {
            write_cycle_ms: 10,
            ..Timing::default()
        };
        let config = Config::default()
            .with_hardware_address(3)
            .with_timing(timing);
        assert_eq!(config.hardware_address, 3);
        assert_eq!(config.timing.write_cycle_ms, 10);
        assert_eq!(config.timing.wp_setup_ms, 1);
    }
}
