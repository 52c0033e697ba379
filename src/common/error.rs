// src/common/error.rs

use arrayvec::ArrayVec;

use super::frame::MAX_RESPONSE_LEN;
use super::types::UnitTable;

/// A received CRC byte did not match the CRC calculated over its word.
///
/// Carries the complete received buffer for diagnostics. This indicates corrupted
/// data or a transport that lost byte alignment and is never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("I2C error: received wrong checksum {received:#04x} (expected {expected:#04x})")]
pub struct ChecksumError {
    pub received: u8,
    pub expected: u8,
    pub data: ArrayVec<u8, MAX_RESPONSE_LEN>,
}

impl ChecksumError {
    pub(crate) fn new(received: u8, expected: u8, buffer: &[u8]) -> Self {
        let mut data = ArrayVec::new();
        for &byte in buffer.iter().take(MAX_RESPONSE_LEN) {
            data.push(byte);
        }
        ChecksumError { received, expected, data }
    }
}

/// Errors raised while building a frame or decoding/interpreting a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordCodecError {
    #[error(transparent)]
    Checksum(#[from] ChecksumError),

    /// Response length is not a whole number of word blocks.
    #[error("Truncated frame: {len} bytes is not a whole number of words")]
    TruncatedFrame { len: usize },

    /// Frame or word list does not fit into its fixed-capacity buffer.
    #[error("Frame overflow: needed {needed} bytes, capacity {capacity}")]
    FrameOverflow { needed: usize, capacity: usize },

    /// Opcode does not fit into the configured opcode width.
    #[error("Opcode {0:#06x} does not fit the configured opcode width")]
    OpcodeOutOfRange(u16),

    /// The command expects response data but none was received.
    #[error("No data received")]
    NoData,

    /// Fewer words were received than the command interprets.
    #[error("Short response: expected {expected} words, got {got}")]
    ShortResponse { expected: usize, got: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Sfm3019Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying failure of the bridge/transport, passed through unmodified.
    #[error("Transport error: {0:?}")]
    Transport(E),

    /// Framing, CRC or response-length failure.
    #[error(transparent)]
    Codec(#[from] WordCodecError),

    /// A command parameter is outside its valid range. Raised before anything is sent.
    #[error("Value {value} out of range {min}..={max}")]
    Range { value: i32, min: i32, max: i32 },

    /// The Air/O2-mix mode was requested without an O2 fraction.
    #[error("O2 volume fraction is required for Air/O2 mix measurements")]
    MissingO2Fraction,

    /// A flow unit code has no entry in its lookup table.
    #[error("Unknown {table} code {code:#x}")]
    Lookup { table: UnitTable, code: u8 },

    /// The session is not in a state that allows the operation.
    #[error("Precondition failed: {0}")]
    Precondition(&'static str),

    /// A command produced a response of a different kind than requested.
    #[error("Unexpected response received")]
    UnexpectedResponse,
}

impl<E: core::fmt::Debug> From<ChecksumError> for Sfm3019Error<E> {
    fn from(e: ChecksumError) -> Self {
        Sfm3019Error::Codec(WordCodecError::Checksum(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct MockIoError;

    #[test]
    fn test_checksum_error_keeps_buffer() {
        let err = ChecksumError::new(0x12, 0xC0, &[0x00, 0x78, 0x12]);
        assert_eq!(err.received, 0x12);
        assert_eq!(err.expected, 0xC0);
        assert_eq!(err.data.as_slice(), &[0x00, 0x78, 0x12]);
    }

    #[test]
    fn test_checksum_error_message() {
        let err = ChecksumError::new(0x12, 0xC0, &[]);
        assert_eq!(
            err.to_string(),
            "I2C error: received wrong checksum 0x12 (expected 0xc0)"
        );
    }

    #[test]
    fn test_checksum_error_lifts_into_device_error() {
        let err: Sfm3019Error<MockIoError> = ChecksumError::new(0x00, 0x81, &[0x00, 0x00, 0x00]).into();
        assert!(matches!(
            err,
            Sfm3019Error::Codec(WordCodecError::Checksum(ChecksumError { received: 0x00, expected: 0x81, .. }))
        ));
    }

    #[test]
    fn test_transport_message_uses_debug() {
        let err: Sfm3019Error<MockIoError> = Sfm3019Error::Transport(MockIoError);
        assert_eq!(err.to_string(), "Transport error: MockIoError");
    }
}
