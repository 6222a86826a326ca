// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use crc::{Algorithm, Crc};

use crate::error::{Result, Sgp30Error};

/// CRC-8 used by Sensirion gas sensors: polynomial 0x31, init 0xFF,
/// no reflection, no final xor. Datasheet section 6.6.
pub const SGP30_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xff,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xf7,
    residue: 0x00,
};

/// Test vector every algorithm must reproduce its `check` value over.
const CHECK_INPUT: &[u8] = b"123456789";

/// Checksum calculator bound to one verified algorithm.
pub struct Checksum {
    crc: Crc<u8>,
}

impl Checksum {
    /// Build a calculator for `algorithm`.
    ///
    /// Fails with [`Sgp30Error::InvalidChecksum`] when the table does not
    /// reproduce the algorithm's check value over `"123456789"`.
    pub fn new(algorithm: &'static Algorithm<u8>) -> Result<Checksum> {
        let crc = Crc::<u8>::new(algorithm);
        let actual = crc.checksum(CHECK_INPUT);
        if actual != algorithm.check {
            return Err(Sgp30Error::InvalidChecksum {
                expected: algorithm.check,
                actual,
            });
        }
        Ok(Checksum { crc })
    }

    /// Calculator for the fixed sensor algorithm, self-checked like any other.
    pub fn sgp30() -> Result<Checksum> {
        Checksum::new(&SGP30_CRC)
    }

    pub fn checksum(&self, bytes: &[u8]) -> u8 {
        self.crc.checksum(bytes)
    }
}
