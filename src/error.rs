// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause carried by bus level errors.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Sgp30Error>;

///
///SGP30 error enum. Every operation either succeeds or
///reports exactly one of these kinds; none of them is
///fatal to the process.
///
#[derive(Debug, Error)]
pub enum Sgp30Error {
    /// An operation needed the bus but no transport is open
    #[error("i2c not connected")]
    NotConnected,
    /// Close was called without an open transport
    #[error("connection already closed")]
    AlreadyClosed,
    /// The bus device could not be opened
    #[error("failed to open i2c device {}", .path.display())]
    ConnectionError {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    /// A write or read failed at the bus level
    #[error("i2c transfer failed: {0}")]
    TransportError(#[source] BoxError),
    /// A reply word did not match its checksum byte.
    /// `expected` is the value computed locally, `actual` the received byte.
    #[error("crc mismatch, expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },
    /// Feature set check failed or could not be read during initialization
    #[error("sgp30 sensor not found")]
    SensorNotFound,
    /// A checksum algorithm did not reproduce its own check value
    #[error("checksum self-check failed, expected {expected:#04x}, got {actual:#04x}")]
    InvalidChecksum { expected: u8, actual: u8 },
    /// A reply buffer did not hold a whole number of expected words
    #[error("reply is {actual} bytes, expected {expected}")]
    ReplyLength { expected: usize, actual: usize },
    /// More words than fit in 64 bits, or none at all
    #[error("cannot combine {0} words into 64 bits")]
    WordCount(usize),
}

impl Sgp30Error {
    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Sgp30Error::TransportError(Box::new(err))
    }
}
