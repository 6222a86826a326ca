// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! SGP30 driver implementing the SGP30 I2C gas sensor operations on Linux
//!
//! Operations taken from the [datasheet](https://sensirion.com/media/documents/984E0DD5/61644B8B/Sensirion_Gas_Sensors_Datasheet_SGP30.pdf)
//!
//! Every command is a 16 bit big endian code, optionally followed by
//! argument words. Every word on the wire, in either direction, is
//! followed by a CRC-8 (polynomial 0x31, init 0xFF). Replies with a bad
//! checksum are rejected as a whole.
//!
//! Before measuring, [`Sgp30::init`] opens the bus, reads the serial id,
//! checks the feature set and starts the air quality algorithm. The sensor
//! should then be polled once per second with [`Sgp30::measure`].
//!
//! ## Basic Example
//!
//! Obtaining measurements, eCO2 and TVOC
//!
//!```no_run
//!use sgp30_i2c::{Config, Sgp30};
//!use std::thread;
//!use std::time::Duration;
//!
//!fn main() {
//!    let mut sgp = Sgp30::new(Config::default()).unwrap();
//!    sgp.init().unwrap();
//!
//!    loop {
//!        match sgp.measure() {
//!            Ok(quality) => println!("{}", quality),
//!            Err(e) => println!("Error obtaining measurements. More details: {}", e),
//!        }
//!        thread::sleep(Duration::from_secs(1));
//!    }
//!}
//!```
//!
//! Logging goes through the [`log`] facade; install any logger to see it.

pub mod checksum;
pub mod command;
pub mod config;
pub mod error;
#[cfg(test)]
mod mock;
/// SGP30 session and measurement types
pub mod sgp30;
pub mod transport;
pub mod word;

pub use checksum::{Checksum, SGP30_CRC};
pub use command::CommandCode;
pub use config::Config;
pub use error::{Result, Sgp30Error};
pub use sgp30::{AirQuality, Baseline, RawSignals, SensorIdentity, SessionState, Sgp30};
pub use transport::{Bus, LinuxBus, Transport};
