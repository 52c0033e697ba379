// src/common/frame.rs

//! Word-oriented I2C framing.
//!
//! Sensirion sensors exchange 16-bit words, each followed on the wire by a CRC-8
//! over its two bytes. A write frame starts with the opcode, which is never
//! CRC-protected:
//!
//! ```text
//! [opcode_hi?][opcode_lo][word0_hi][word0_lo][crc0][word1_hi][word1_lo][crc1]...
//! ```
//!
//! A read frame is a plain concatenation of `(word_hi, word_lo, crc)` triples.

use arrayvec::ArrayVec;

use super::crc::CrcCalculator;
use super::error::{ChecksumError, WordCodecError};

/// Maximum number of data words in a single frame.
pub const MAX_WORDS: usize = 16;
/// Capacity of an encoded write frame (2-byte opcode + `MAX_WORDS` CRC-protected words).
pub const MAX_FRAME_LEN: usize = 2 + 3 * MAX_WORDS;
/// Capacity of a raw response buffer (`MAX_WORDS` CRC-protected words).
pub const MAX_RESPONSE_LEN: usize = 3 * MAX_WORDS;

/// Encoded bytes of a write frame.
pub type TxFrame = ArrayVec<u8, MAX_FRAME_LEN>;
/// Verified words of a read frame.
pub type Words = ArrayVec<u16, MAX_WORDS>;

/// Number of bytes the opcode occupies on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpcodeWidth {
    One,
    Two,
}

impl OpcodeWidth {
    #[inline]
    pub const fn byte_len(&self) -> usize {
        match self {
            OpcodeWidth::One => 1,
            OpcodeWidth::Two => 2,
        }
    }
}

/// Encoder/decoder for word-oriented frames.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WordCodec {
    opcode_width: OpcodeWidth,
    crc: Option<CrcCalculator>,
}

impl WordCodec {
    /// Two-byte opcodes with the Sensirion CRC-8 after every word.
    pub const SENSIRION: WordCodec = WordCodec::new(OpcodeWidth::Two, Some(CrcCalculator::SENSIRION_CRC8));

    /// Creates a codec. Pass `None` as `crc` for devices that send bare words.
    pub const fn new(opcode_width: OpcodeWidth, crc: Option<CrcCalculator>) -> Self {
        WordCodec { opcode_width, crc }
    }

    #[inline]
    pub const fn opcode_width(&self) -> OpcodeWidth {
        self.opcode_width
    }

    /// Bytes one word occupies on the wire.
    #[inline]
    pub const fn bytes_per_word(&self) -> usize {
        if self.crc.is_some() {
            3
        } else {
            2
        }
    }

    /// Number of response bytes needed to carry `words` words.
    #[inline]
    pub const fn response_len(&self, words: usize) -> usize {
        words * self.bytes_per_word()
    }

    /// Builds the write frame for `opcode` followed by `tx_words`.
    ///
    /// `None` for both yields an empty frame, meaning nothing is written.
    /// `Some(&[])` as `tx_words` with no opcode also yields no bytes.
    pub fn encode(&self, opcode: Option<u16>, tx_words: Option<&[u16]>) -> Result<TxFrame, WordCodecError> {
        let mut frame = TxFrame::new();
        if opcode.is_none() && tx_words.is_none() {
            return Ok(frame);
        }

        let words = tx_words.unwrap_or(&[]);
        let needed = opcode.map_or(0, |_| self.opcode_width.byte_len()) + words.len() * self.bytes_per_word();
        if needed > MAX_FRAME_LEN {
            return Err(WordCodecError::FrameOverflow { needed, capacity: MAX_FRAME_LEN });
        }

        if let Some(op) = opcode {
            match self.opcode_width {
                OpcodeWidth::One => {
                    let byte = u8::try_from(op).map_err(|_| WordCodecError::OpcodeOutOfRange(op))?;
                    frame.push(byte);
                }
                OpcodeWidth::Two => frame.extend(op.to_be_bytes()),
            }
        }

        for &word in words {
            let raw = word.to_be_bytes();
            frame.extend(raw);
            if let Some(crc) = &self.crc {
                frame.push(crc.checksum(&raw) as u8);
            }
        }

        Ok(frame)
    }

    /// Splits a received buffer into words, verifying the CRC of each.
    ///
    /// Returns `Ok(None)` if `data` is empty ("no data", as opposed to an empty word list).
    pub fn decode(&self, data: &[u8]) -> Result<Option<Words>, WordCodecError> {
        if data.is_empty() {
            return Ok(None);
        }

        let block = self.bytes_per_word();
        if data.len() % block != 0 {
            return Err(WordCodecError::TruncatedFrame { len: data.len() });
        }
        let count = data.len() / block;
        if count > MAX_WORDS {
            return Err(WordCodecError::FrameOverflow { needed: data.len(), capacity: MAX_RESPONSE_LEN });
        }

        let mut words = Words::new();
        for chunk in data.chunks_exact(block) {
            let raw = [chunk[0], chunk[1]];
            if let Some(crc) = &self.crc {
                let received = chunk[2];
                let expected = crc.checksum(&raw) as u8;
                if received != expected {
                    log::warn!(
                        "CRC mismatch: received {:#04x}, expected {:#04x} in {:02X?}",
                        received,
                        expected,
                        data
                    );
                    return Err(ChecksumError::new(received, expected, data).into());
                }
            }
            words.push(u16::from_be_bytes(raw));
        }

        Ok(Some(words))
    }
}

impl Default for WordCodec {
    fn default() -> Self {
        Self::SENSIRION
    }
}
