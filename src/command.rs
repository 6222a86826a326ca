// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::thread;
use std::time::Duration;

use log::{debug, error};

use crate::checksum::Checksum;
use crate::error::{Result, Sgp30Error};
use crate::transport::Transport;
use crate::word::{self, FRAMED_WORD_LEN};

/// SGP30 command codes, datasheet table 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CommandCode {
    InitAirQuality = 0x2003,
    MeasureAirQuality = 0x2008,
    GetBaseline = 0x2015,
    SetBaseline = 0x201e,
    SetHumidity = 0x2061,
    MeasureTest = 0x2032,
    GetFeatureSetVersion = 0x202f,
    MeasureRawSignals = 0x2050,
    GetSerialId = 0x3682,
}

impl CommandCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Minimum processing time the sensor needs before the reply can be read.
    pub fn min_settle(self) -> Duration {
        match self {
            CommandCode::MeasureTest => Duration::from_millis(220),
            CommandCode::MeasureRawSignals => Duration::from_millis(25),
            CommandCode::MeasureAirQuality => Duration::from_millis(12),
            CommandCode::InitAirQuality
            | CommandCode::GetBaseline
            | CommandCode::SetBaseline
            | CommandCode::SetHumidity
            | CommandCode::GetFeatureSetVersion => Duration::from_millis(10),
            CommandCode::GetSerialId => Duration::from_micros(500),
        }
    }

    /// Wire form: the big endian code followed by each argument as a framed word.
    pub fn encode(self, crc: &Checksum, args: &[u16]) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(2 + args.len() * FRAMED_WORD_LEN);
        buffer.extend_from_slice(&self.code().to_be_bytes());
        for &arg in args {
            buffer.extend_from_slice(&word::pack_word(crc, arg));
        }
        buffer
    }
}

/// Write `command`, wait `settle`, then read and verify `reply_words` words.
///
/// Without a transport this fails with [`Sgp30Error::NotConnected`] before
/// touching the bus. A failed write skips the read. Nothing is retried.
pub fn execute<T: Transport>(
    transport: Option<&mut T>,
    crc: &Checksum,
    settle: Duration,
    command: &[u8],
    reply_words: usize,
) -> Result<Vec<u16>> {
    let transport = transport.ok_or(Sgp30Error::NotConnected)?;

    debug!("writing command {:02x?}", command);
    transport.write(command).map_err(|e| {
        error!("failed writing command {:02x?}: {}", command, e);
        Sgp30Error::transport(e)
    })?;

    if !settle.is_zero() {
        thread::sleep(settle);
    }
    if reply_words == 0 {
        return Ok(Vec::new());
    }

    let mut reply = vec![0u8; reply_words * FRAMED_WORD_LEN];
    transport.read(&mut reply).map_err(|e| {
        error!("failed read: {}", e);
        Sgp30Error::transport(e)
    })?;
    debug!("read reply {:02x?}", reply);

    word::unframe(crc, &reply, reply_words)
}
