// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error;
use std::io;

use i2cdev::core::{I2CDevice, I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError, LinuxI2CMessage};
use log::debug;

use crate::config::Config;
use crate::error::{Result, Sgp30Error};

/// Blocking byte transport to the sensor.
///
/// Reads and writes always move the whole buffer or fail.
pub trait Transport {
    type Error: Error + Send + Sync + 'static;

    fn write(&mut self, buf: &[u8]) -> std::result::Result<(), Self::Error>;

    fn read(&mut self, buf: &mut [u8]) -> std::result::Result<(), Self::Error>;

    /// Release the device.
    fn close(self) -> std::result::Result<(), Self::Error>;
}

/// Opens transports to the sensor.
pub trait Bus {
    type Transport: Transport;

    fn connect(&mut self, config: &Config) -> Result<Self::Transport>;
}

impl Transport for LinuxI2CDevice {
    type Error = LinuxI2CError;

    /// Sent as one `I2C_RDWR` message: `I2CDevice::write` drops the byte
    /// count, the kernel completes a message whole or fails it.
    fn write(&mut self, buf: &[u8]) -> std::result::Result<(), LinuxI2CError> {
        let mut messages = [<LinuxI2CMessage as I2CMessage>::write(buf)];
        let sent = I2CTransfer::transfer(self, &mut messages)?;
        check_sent(sent, messages.len())
    }

    /// `I2CDevice::read` uses `read_exact`, a short read is an error.
    fn read(&mut self, buf: &mut [u8]) -> std::result::Result<(), LinuxI2CError> {
        I2CDevice::read(self, buf)
    }

    fn close(self) -> std::result::Result<(), LinuxI2CError> {
        // the file descriptor is released on drop
        drop(self);
        Ok(())
    }
}

fn check_sent(sent: u32, expected: usize) -> std::result::Result<(), LinuxI2CError> {
    if sent as usize == expected {
        return Ok(());
    }
    Err(LinuxI2CError::Io(io::Error::new(
        io::ErrorKind::WriteZero,
        format!("{} of {} i2c messages transferred", sent, expected),
    )))
}

/// Linux `/dev/i2c-*` character devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxBus;

impl Bus for LinuxBus {
    type Transport = LinuxI2CDevice;

    fn connect(&mut self, config: &Config) -> Result<LinuxI2CDevice> {
        let path = &config.i2c_path;
        if !path.exists() {
            return Err(Sgp30Error::ConnectionError {
                path: path.clone(),
                source: Box::new(io::Error::new(
                    io::ErrorKind::NotFound,
                    "i2c FS path not found",
                )),
            });
        }

        // the character device runs at the adapter's configured clock
        debug!(
            "opening {} at {:#04x}, requested {} Hz",
            path.display(),
            config.i2c_addr,
            config.frequency_hz
        );
        LinuxI2CDevice::new(path, config.i2c_addr).map_err(|e| Sgp30Error::ConnectionError {
            path: path.clone(),
            source: Box::new(e),
        })
    }
}
