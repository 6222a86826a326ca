// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_I2C_PATH: &str = "/dev/i2c-1";
pub const DEFAULT_I2C_ADDR: u16 = 0x58;
pub const DEFAULT_FREQUENCY_HZ: u32 = 100_000;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

/// Connection settings for the sensor.
///
/// `frequency_hz` is handed to the bus and not used by the protocol.
/// `delay` is the settle time between writing a command and reading its
/// reply; zero skips the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub i2c_path: PathBuf,
    pub i2c_addr: u16,
    pub frequency_hz: u32,
    pub delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            i2c_path: PathBuf::from(DEFAULT_I2C_PATH),
            i2c_addr: DEFAULT_I2C_ADDR,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            delay: DEFAULT_DELAY,
        }
    }
}

impl Config {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.i2c_path = path.into();
        self
    }

    pub fn with_addr(mut self, addr: u16) -> Self {
        self.i2c_addr = addr;
        self
    }

    pub fn with_frequency(mut self, frequency_hz: u32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.i2c_path, PathBuf::from("/dev/i2c-1"));
        assert_eq!(cfg.i2c_addr, 0x58);
        assert_eq!(cfg.frequency_hz, 100_000);
        assert_eq!(cfg.delay, Duration::from_millis(10));
    }

    #[test]
    fn setters() {
        let cfg = Config::default()
            .with_path("/dev/i2c-0")
            .with_addr(0x59)
            .with_frequency(400_000)
            .with_delay(Duration::ZERO);
        assert_eq!(cfg.i2c_path, PathBuf::from("/dev/i2c-0"));
        assert_eq!(cfg.i2c_addr, 0x59);
        assert_eq!(cfg.frequency_hz, 400_000);
        assert!(cfg.delay.is_zero());
    }
}
