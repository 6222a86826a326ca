// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Word framing: every 16 bit value on the wire is sent big endian
//! followed by its CRC-8 byte.

use log::error;

use crate::checksum::Checksum;
use crate::error::{Result, Sgp30Error};

/// Bytes per framed word: two data bytes plus the checksum.
pub const FRAMED_WORD_LEN: usize = 3;

/// Wire form of one word, `[high, low, crc]`.
pub type FramedWord = [u8; FRAMED_WORD_LEN];

/// Big endian encode `word` and append its checksum.
pub fn pack_word(crc: &Checksum, word: u16) -> FramedWord {
    let [high, low] = word.to_be_bytes();
    [high, low, crc.checksum(&[high, low])]
}

/// Split a reply into `count` words, verifying every checksum.
///
/// The buffer must hold exactly `count` framed words, otherwise
/// [`Sgp30Error::ReplyLength`]. Decoding stops at the first bad checksum
/// and nothing decoded so far is returned.
pub fn unframe(crc: &Checksum, buffer: &[u8], count: usize) -> Result<Vec<u16>> {
    let expected = count * FRAMED_WORD_LEN;
    if buffer.len() != expected {
        error!("reply is {} bytes, expected {}", buffer.len(), expected);
        return Err(Sgp30Error::ReplyLength {
            expected,
            actual: buffer.len(),
        });
    }

    buffer
        .chunks_exact(FRAMED_WORD_LEN)
        .map(|group| {
            let expected = crc.checksum(&group[..2]);
            let actual = group[2];
            if expected != actual {
                error!("crc mismatch {:#04x}, {:#04x}", actual, expected);
                return Err(Sgp30Error::ChecksumMismatch { expected, actual });
            }
            Ok(u16::from_be_bytes([group[0], group[1]]))
        })
        .collect()
}

/// Concatenate words most significant first, e.g. the 48 bit serial id
/// from its three reply words. Takes 1 to 4 words, anything else is
/// [`Sgp30Error::WordCount`].
pub fn combine_words(words: &[u16]) -> Result<u64> {
    if !(1..=4).contains(&words.len()) {
        return Err(Sgp30Error::WordCount(words.len()));
    }
    Ok(words
        .iter()
        .fold(0u64, |acc, &word| (acc << 16) | u64::from(word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_known_words() {
        let crc = Checksum::sgp30().unwrap();
        assert_eq!(pack_word(&crc, 0x1234), [0x12, 0x34, 0x37]);
        assert_eq!(pack_word(&crc, 0x0000), [0x00, 0x00, 0x81]);
        assert_eq!(pack_word(&crc, 0x0020), [0x00, 0x20, 0x07]);
    }

    #[test]
    fn packed_word_unframes() {
        let crc = Checksum::sgp30().unwrap();
        for word in [0x0000, 0x0001, 0x00ff, 0x1234, 0x8000, 0xd400, 0xffff] {
            let framed = pack_word(&crc, word);
            assert_eq!(unframe(&crc, &framed, 1).unwrap(), vec![word]);
        }
    }

    #[test]
    fn unframe_keeps_order() {
        let crc = Checksum::sgp30().unwrap();
        let reply = [0x01, 0x02, 0x17, 0x03, 0x04, 0x68, 0x05, 0x06, 0x50];
        assert_eq!(
            unframe(&crc, &reply, 3).unwrap(),
            vec![0x0102, 0x0304, 0x0506]
        );
    }

    #[test]
    fn unframe_empty_reply() {
        assert!(unframe(&Checksum::sgp30().unwrap(), &[], 0).unwrap().is_empty());
    }

    #[test]
    fn unframe_aborts_on_first_mismatch() {
        let crc = Checksum::sgp30().unwrap();

        let reply = [0x01, 0x02, 0x17, 0x03, 0x04, 0x00];
        match unframe(&crc, &reply, 2) {
            Err(Sgp30Error::ChecksumMismatch { expected, actual }) => {
                assert_eq!(expected, 0x68);
                assert_eq!(actual, 0x00);
            }
            other => panic!("expected ChecksumMismatch, got {:?}", other),
        }

        // both groups broken, the first one is reported
        let reply = [0x01, 0x02, 0x03, 0x03, 0x04, 0x00];
        assert!(matches!(
            unframe(&crc, &reply, 2),
            Err(Sgp30Error::ChecksumMismatch {
                expected: 0x17,
                actual: 0x03
            })
        ));
    }

    #[test]
    fn unframe_rejects_wrong_length() {
        let crc = Checksum::sgp30().unwrap();
        assert!(matches!(
            unframe(&crc, &[0x01, 0x02, 0x17, 0x03], 1),
            Err(Sgp30Error::ReplyLength {
                expected: 3,
                actual: 4
            })
        ));
        assert!(matches!(
            unframe(&crc, &[0x01, 0x02, 0x17], 2),
            Err(Sgp30Error::ReplyLength {
                expected: 6,
                actual: 3
            })
        ));
    }

    #[test]
    fn combine() {
        assert_eq!(combine_words(&[0x1234]).unwrap(), 0x1234);
        assert_eq!(combine_words(&[0x1234, 0x5678]).unwrap(), 0x1234_5678);
        assert_eq!(combine_words(&[0x4321, 0x8765, 0xdcbe]).unwrap(), 0x4321_8765_dcbe);
        assert_eq!(
            combine_words(&[0x1234, 0x5678, 0x90ab, 0xcdef]).unwrap(),
            0x1234_5678_90ab_cdef
        );
    }

    #[test]
    fn combine_rejects_out_of_range() {
        assert!(matches!(combine_words(&[]), Err(Sgp30Error::WordCount(0))));
        assert!(matches!(
            combine_words(&[0x0001, 0x0002, 0x0003, 0x0004, 0x0005]),
            Err(Sgp30Error::WordCount(5))
        ));
    }
}
