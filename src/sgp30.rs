// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::mem;
use std::thread;
use std::time::Duration;

use log::{debug, error, warn};

use crate::checksum::Checksum;
use crate::command::{self, CommandCode};
use crate::config::Config;
use crate::error::{Result, Sgp30Error};
use crate::transport::{Bus, LinuxBus, Transport};
use crate::word;

/// Feature set reported by a supported SGP30.
pub const EXPECTED_FEATURE_SET: u16 = 0x0020;

/// Reply of the built in self test when every check passed.
pub const MEASURE_TEST_PASSED: u16 = 0xd400;

/// Air quality signals, eCO2 in ppm and TVOC in ppb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AirQuality {
    pub eco2: u16,
    pub tvoc: u16,
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "eCO2: {} ppm TVOC: {} ppb", self.eco2, self.tvoc)
    }
}

/// Calibration values, read back and restored across power cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Baseline {
    pub eco2: u16,
    pub tvoc: u16,
}

/// Raw H2 and ethanol sensor signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSignals {
    pub h2: u16,
    pub ethanol: u16,
}

/// What the sensor reported about itself during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorIdentity {
    /// 48 bit serial id, zero when it could not be read.
    pub serial_id: u64,
    pub feature_set: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Connected,
    Initialized,
    Closed,
}

enum Link<T> {
    Unopened,
    Connected(T),
    Initialized(T),
    Closed,
}

impl<T> Link<T> {
    fn state(&self) -> SessionState {
        match self {
            Link::Unopened => SessionState::Unopened,
            Link::Connected(_) => SessionState::Connected,
            Link::Initialized(_) => SessionState::Initialized,
            Link::Closed => SessionState::Closed,
        }
    }

    fn transport_mut(&mut self) -> Option<&mut T> {
        match self {
            Link::Connected(t) | Link::Initialized(t) => Some(t),
            Link::Unopened | Link::Closed => None,
        }
    }

    fn set_initialized(&mut self, initialized: bool) {
        *self = match mem::replace(self, Link::Unopened) {
            Link::Connected(t) | Link::Initialized(t) if initialized => Link::Initialized(t),
            Link::Connected(t) | Link::Initialized(t) => Link::Connected(t),
            other => other,
        };
    }
}

/// SGP30 session. Owns the bus transport and the identity read at
/// initialization.
///
/// Every call blocks until the sensor answered. The session is not meant
/// to be shared between threads without a lock.
pub struct Sgp30<B: Bus = LinuxBus> {
    config: Config,
    bus: B,
    crc: Checksum,
    link: Link<B::Transport>,
    identity: SensorIdentity,
}

impl Sgp30<LinuxBus> {
    /// Create a session on a Linux i2c character device.
    /// Nothing is opened until [`Sgp30::open`] or [`Sgp30::init`].
    pub fn new(config: Config) -> Result<Sgp30<LinuxBus>> {
        Sgp30::with_bus(config, LinuxBus)
    }
}

impl<B: Bus> Sgp30<B> {
    /// Create a session opening its transport through `bus`.
    ///
    /// Fails only if the checksum table does not pass its self-check.
    pub fn with_bus(config: Config, bus: B) -> Result<Sgp30<B>> {
        Ok(Sgp30 {
            config,
            bus,
            crc: Checksum::sgp30()?,
            link: Link::Unopened,
            identity: SensorIdentity::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.link.state()
    }

    pub fn identity(&self) -> SensorIdentity {
        self.identity
    }

    pub fn serial_id(&self) -> u64 {
        self.identity.serial_id
    }

    /// Open the bus device. Does nothing if already open.
    ///
    /// A closed session stays closed and returns [`Sgp30Error::AlreadyClosed`].
    pub fn open(&mut self) -> Result<()> {
        match self.link {
            Link::Connected(_) | Link::Initialized(_) => {
                warn!("i2c connection already started");
                Ok(())
            }
            Link::Closed => Err(Sgp30Error::AlreadyClosed),
            Link::Unopened => {
                let transport = self.bus.connect(&self.config).map_err(|e| {
                    error!("{}", e);
                    e
                })?;
                debug!("connected to {}", self.config.i2c_path.display());
                self.link = Link::Connected(transport);
                Ok(())
            }
        }
    }

    /// Open the device, give it the settle delay, then run [`Sgp30::initialize`].
    pub fn init(&mut self) -> Result<()> {
        self.open()?;
        if !self.config.delay.is_zero() {
            thread::sleep(self.config.delay);
        }
        self.initialize()
    }

    /// Identify the sensor and start air quality measurement.
    ///
    /// A serial id that cannot be read is stored as 0 and does not stop
    /// initialization. A feature set other than [`EXPECTED_FEATURE_SET`],
    /// or one that cannot be read, fails with [`Sgp30Error::SensorNotFound`].
    /// On any failure the stored identity is zeroed and the session stays
    /// connected but not initialized. Calling it again on an initialized
    /// session repeats the handshake.
    pub fn initialize(&mut self) -> Result<()> {
        if self.link.transport_mut().is_none() {
            return Err(Sgp30Error::NotConnected);
        }

        let serial_id = match self.read_serial() {
            Ok(serial) => serial,
            Err(e) => {
                warn!("failed to get serial: {}", e);
                0
            }
        };

        let feature_set = match self.read_feature_set() {
            Ok(feature_set) if feature_set == EXPECTED_FEATURE_SET => feature_set,
            Ok(feature_set) => {
                error!("sgp30 featureset mismatch: {:#06x}", feature_set);
                return Err(self.fail_init(Sgp30Error::SensorNotFound));
            }
            Err(e) => {
                error!("failed to get feature set: {}", e);
                return Err(self.fail_init(Sgp30Error::SensorNotFound));
            }
        };

        if let Err(e) = self.command(CommandCode::InitAirQuality, &[], 0) {
            return Err(self.fail_init(e));
        }

        self.identity = SensorIdentity {
            serial_id,
            feature_set,
        };
        self.link.set_initialized(true);
        debug!("sgp30 initialized, serial {:#014x}", serial_id);
        Ok(())
    }

    /// Read eCO2 and TVOC. Only meaningful once initialized, though a
    /// connected session is allowed to ask.
    pub fn measure(&mut self) -> Result<AirQuality> {
        let words = self.command(CommandCode::MeasureAirQuality, &[], 2)?;
        Ok(AirQuality {
            eco2: words[0],
            tvoc: words[1],
        })
    }

    pub fn get_baseline(&mut self) -> Result<Baseline> {
        let words = self.command(CommandCode::GetBaseline, &[], 2)?;
        Ok(Baseline {
            eco2: words[0],
            tvoc: words[1],
        })
    }

    pub fn set_baseline(&mut self, eco2: u16, tvoc: u16) -> Result<()> {
        self.command(CommandCode::SetBaseline, &[eco2, tvoc], 0)?;
        Ok(())
    }

    /// Set absolute humidity for compensation, g/m³ in 8.8 fixed point.
    /// Zero turns compensation off.
    pub fn set_humidity(&mut self, absolute_humidity: u16) -> Result<()> {
        self.command(CommandCode::SetHumidity, &[absolute_humidity], 0)?;
        Ok(())
    }

    /// Run the on chip self test. Returns true if it passed.
    pub fn measure_test(&mut self) -> Result<bool> {
        let words = self.command(CommandCode::MeasureTest, &[], 1)?;
        Ok(words[0] == MEASURE_TEST_PASSED)
    }

    pub fn measure_raw_signals(&mut self) -> Result<RawSignals> {
        let words = self.command(CommandCode::MeasureRawSignals, &[], 2)?;
        Ok(RawSignals {
            h2: words[0],
            ethanol: words[1],
        })
    }

    /// Release the transport. Later operations fail with
    /// [`Sgp30Error::NotConnected`]. A close error from the bus is returned
    /// after the handle has been dropped.
    pub fn close(&mut self) -> Result<()> {
        match mem::replace(&mut self.link, Link::Closed) {
            Link::Connected(transport) | Link::Initialized(transport) => {
                debug!("closing {}", self.config.i2c_path.display());
                transport.close().map_err(Sgp30Error::transport)
            }
            other => {
                self.link = other;
                Err(Sgp30Error::AlreadyClosed)
            }
        }
    }

    fn read_serial(&mut self) -> Result<u64> {
        let words = self.command(CommandCode::GetSerialId, &[], 3)?;
        word::combine_words(&words)
    }

    fn read_feature_set(&mut self) -> Result<u16> {
        let words = self.command(CommandCode::GetFeatureSetVersion, &[], 1)?;
        Ok(words[0])
    }

    fn fail_init(&mut self, err: Sgp30Error) -> Sgp30Error {
        self.identity = SensorIdentity::default();
        self.link.set_initialized(false);
        err
    }

    fn command(&mut self, cmd: CommandCode, args: &[u16], reply_words: usize) -> Result<Vec<u16>> {
        let bytes = cmd.encode(&self.crc, args);
        let settle = self.settle(cmd);
        command::execute(
            self.link.transport_mut(),
            &self.crc,
            settle,
            &bytes,
            reply_words,
        )
    }

    fn settle(&self, cmd: CommandCode) -> Duration {
        match cmd {
            CommandCode::MeasureTest | CommandCode::MeasureRawSignals => {
                self.config.delay.max(cmd.min_settle())
            }
            _ => self.config.delay,
        }
    }
}
