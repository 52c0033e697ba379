// src/common/command.rs

//! SFM3019 command definitions.
//!
//! See the SFM3019 datasheet, section 6 "Operation and Communication".

use arrayvec::ArrayVec;
use core::fmt::Debug;
use core::time::Duration;

use super::error::{Sfm3019Error, WordCodecError};
use super::frame::{TxFrame, WordCodec};
use super::timing;
use super::types::{int16, Calibration, Identifier, MeasurementMode, RawMeasurement};

/// Read product identifier and serial number.
pub const READ_PRODUCT_IDENTIFIER: u16 = 0xE102;
/// Stop continuous measurement.
pub const STOP_MEASUREMENT: u16 = 0x3FF9;
/// Read scale factor, offset and unit for a measurement command.
pub const GET_UNIT_AND_FACTORS: u16 = 0x3661;

/// Valid range of the O2 volume fraction, in permille.
pub const O2_FRACTION_RANGE: core::ops::RangeInclusive<i32> = 0..=1000;

/// Represents an SFM3019 command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read Product Identifier and Serial Number (`0xE102`), 18 bytes (6 words) read.
    ReadProductIdentifier,

    /// Start continuous measurement of O2 (`0x3603`).
    StartO2,

    /// Start continuous measurement of Air (`0x3608`).
    StartAir,

    /// Start continuous measurement of an Air/O2 mix (`0x3632`).
    /// Use `Command::start_air_o2_mix` to construct it with a validated fraction.
    StartAirO2Mix { o2_fraction_permille: u16 },

    /// Stop continuous measurement (`0x3FF9`).
    StopMeasurement,

    /// Read one measurement. A pure read without opcode.
    ReadMeasurement,

    /// Get scale factor, offset and unit (`0x3661`) for the given measurement mode.
    GetUnitAndFactors { mode: MeasurementMode },
}

/// Static wire parameters of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    /// Opcode, `None` for a pure read.
    pub opcode: Option<u16>,
    /// Data words following the opcode. `None` means no write phase at all.
    pub tx_words: Option<ArrayVec<u16, 1>>,
    /// Bytes to read including CRC. `None` means no read phase.
    pub rx_length: Option<usize>,
    /// Time the device needs between the write and the read phase.
    pub read_delay: Duration,
    /// Clock-stretching timeout.
    pub timeout: Duration,
}

impl FrameSpec {
    /// Encodes the write phase with `codec`.
    pub fn encode(&self, codec: &WordCodec) -> Result<TxFrame, WordCodecError> {
        codec.encode(self.opcode, self.tx_words.as_ref().map(|w| w.as_slice()))
    }

    /// The timeout handed to a bridge without a native read delay:
    /// whichever of read delay and clock-stretch timeout is larger.
    pub fn bridge_timeout(&self) -> Duration {
        self.read_delay.max(self.timeout)
    }
}

/// Interpreted response of a command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Response {
    /// The command has no read phase.
    Empty,
    Identifier(Identifier),
    Measurement(RawMeasurement),
    UnitAndFactors(Calibration),
}

impl Command {
    /// Builds the start command for `mode`.
    ///
    /// `o2_fraction_permille` is required for `AirO2Mix` and ignored otherwise.
    pub fn start_measurement<E: Debug>(
        mode: MeasurementMode,
        o2_fraction_permille: Option<i32>,
    ) -> Result<Self, Sfm3019Error<E>> {
        match mode {
            MeasurementMode::O2 => Ok(Command::StartO2),
            MeasurementMode::Air => Ok(Command::StartAir),
            MeasurementMode::AirO2Mix => {
                let Some(fraction) = o2_fraction_permille else {
                    return Err(Sfm3019Error::MissingO2Fraction);
                };
                Self::start_air_o2_mix(fraction)
            }
        }
    }

    /// Builds the Air/O2 mix start command, rejecting fractions outside 0..=1000 permille.
    pub fn start_air_o2_mix<E: Debug>(o2_fraction_permille: i32) -> Result<Self, Sfm3019Error<E>> {
        if !O2_FRACTION_RANGE.contains(&o2_fraction_permille) {
            return Err(Sfm3019Error::Range {
                value: o2_fraction_permille,
                min: *O2_FRACTION_RANGE.start(),
                max: *O2_FRACTION_RANGE.end(),
            });
        }
        Ok(Command::StartAirO2Mix { o2_fraction_permille: o2_fraction_permille as u16 })
    }

    /// Returns the opcode sent for this command, if any.
    pub fn opcode(&self) -> Option<u16> {
        match self {
            Command::ReadProductIdentifier => Some(READ_PRODUCT_IDENTIFIER),
            Command::StartO2 => Some(MeasurementMode::O2.start_opcode()),
            Command::StartAir => Some(MeasurementMode::Air.start_opcode()),
            Command::StartAirO2Mix { .. } => Some(MeasurementMode::AirO2Mix.start_opcode()),
            Command::StopMeasurement => Some(STOP_MEASUREMENT),
            Command::ReadMeasurement => None,
            Command::GetUnitAndFactors { .. } => Some(GET_UNIT_AND_FACTORS),
        }
    }

    /// Number of response words the interpretation consumes.
    pub fn response_words(&self) -> usize {
        match self {
            Command::ReadProductIdentifier => 6,
            Command::ReadMeasurement => 2,
            Command::GetUnitAndFactors { .. } => 3,
            Command::StartO2
            | Command::StartAir
            | Command::StartAirO2Mix { .. }
            | Command::StopMeasurement => 0,
        }
    }

    /// Returns the wire parameters of this command.
    pub fn frame_spec(&self) -> FrameSpec {
        let mut tx_words = ArrayVec::new();
        let (has_write, rx_length, read_delay) = match self {
            Command::ReadProductIdentifier => (true, Some(18), Duration::ZERO),
            Command::StartO2 | Command::StartAir => (true, None, timing::MEASUREMENT_STARTUP_DELAY),
            Command::StartAirO2Mix { o2_fraction_permille } => {
                tx_words.push(*o2_fraction_permille);
                (true, None, timing::MEASUREMENT_STARTUP_DELAY)
            }
            Command::StopMeasurement => (true, None, timing::COMMAND_DELAY),
            Command::ReadMeasurement => (false, Some(6), Duration::ZERO),
            Command::GetUnitAndFactors { mode } => {
                tx_words.push(mode.start_opcode());
                (true, Some(9), timing::COMMAND_DELAY)
            }
        };

        FrameSpec {
            opcode: self.opcode(),
            tx_words: has_write.then_some(tx_words),
            rx_length,
            read_delay,
            timeout: timing::CLOCK_STRETCH_TIMEOUT,
        }
    }

    /// Interprets the verified words of a response.
    ///
    /// `words` is `None` when nothing was received.
    pub fn interpret(&self, words: Option<&[u16]>) -> Result<Response, WordCodecError> {
        let needed = self.response_words();
        if needed == 0 {
            return Ok(Response::Empty);
        }
        let words = words.ok_or(WordCodecError::NoData)?;
        if words.len() < needed {
            return Err(WordCodecError::ShortResponse { expected: needed, got: words.len() });
        }

        Ok(match self {
            Command::ReadProductIdentifier => {
                let product_id = (u32::from(words[0]) << 16) | u32::from(words[1]);
                let serial_number = words[2..6]
                    .iter()
                    .fold(0u64, |acc, &w| (acc << 16) | u64::from(w));
                Response::Identifier(Identifier { product_id, serial_number })
            }
            Command::ReadMeasurement => Response::Measurement(RawMeasurement {
                flow: int16(words[0]),
                temperature: int16(words[1]),
            }),
            Command::GetUnitAndFactors { .. } => Response::UnitAndFactors(Calibration {
                scale_factor: f32::from(int16(words[0])),
                offset: f32::from(int16(words[1])),
                unit_code: int16(words[2]),
            }),
            Command::StartO2
            | Command::StartAir
            | Command::StartAirO2Mix { .. }
            | Command::StopMeasurement => Response::Empty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(cmd: Command) -> Vec<u8> {
        cmd.frame_spec().encode(&WordCodec::SENSIRION).unwrap().to_vec()
    }

    #[test]
    fn test_command_frames() {
        assert_eq!(encode(Command::ReadProductIdentifier), vec![0xE1, 0x02]);
        assert_eq!(encode(Command::StartO2), vec![0x36, 0x03]);
        assert_eq!(encode(Command::StartAir), vec![0x36, 0x08]);
        assert_eq!(encode(Command::StopMeasurement), vec![0x3F, 0xF9]);
        assert_eq!(encode(Command::ReadMeasurement), Vec::<u8>::new());
        // 1000 = 0x03E8, CRC 0xD4
        assert_eq!(
            encode(Command::StartAirO2Mix { o2_fraction_permille: 1000 }),
            vec![0x36, 0x32, 0x03, 0xE8, 0xD4]
        );
        assert_eq!(
            encode(Command::GetUnitAndFactors { mode: MeasurementMode::Air }),
            vec![0x36, 0x61, 0x36, 0x08, 0xD0]
        );
    }

    #[test]
    fn test_frame_spec_lengths_and_delays() {
        let spec = Command::ReadProductIdentifier.frame_spec();
        assert_eq!(spec.rx_length, Some(18));
        assert_eq!(spec.read_delay, Duration::ZERO);

        let spec = Command::ReadMeasurement.frame_spec();
        assert_eq!(spec.opcode, None);
        assert_eq!(spec.tx_words, None);
        assert_eq!(spec.rx_length, Some(6));

        let spec = Command::StartAir.frame_spec();
        assert_eq!(spec.rx_length, None);
        assert_eq!(spec.read_delay, Duration::from_millis(12));
        assert_eq!(spec.bridge_timeout(), Duration::from_millis(12));

        let spec = Command::GetUnitAndFactors { mode: MeasurementMode::O2 }.frame_spec();
        assert_eq!(spec.rx_length, Some(9));
        assert_eq!(spec.tx_words.as_ref().map(|w| w.as_slice()), Some(&[0x3603u16][..]));
        assert_eq!(spec.read_delay, Duration::from_micros(500));
        assert_eq!(spec.timeout, Duration::ZERO);

        assert_eq!(Command::StopMeasurement.frame_spec().bridge_timeout(), Duration::from_micros(500));
    }

    #[test]
    fn test_air_o2_mix_range() {
        assert_eq!(
            Command::start_air_o2_mix::<()>(0).unwrap(),
            Command::StartAirO2Mix { o2_fraction_permille: 0 }
        );
        assert_eq!(
            Command::start_air_o2_mix::<()>(1000).unwrap(),
            Command::StartAirO2Mix { o2_fraction_permille: 1000 }
        );
        assert!(matches!(
            Command::start_air_o2_mix::<()>(-1),
            Err(Sfm3019Error::Range { value: -1, min: 0, max: 1000 })
        ));
        assert!(matches!(
            Command::start_air_o2_mix::<()>(1001),
            Err(Sfm3019Error::Range { value: 1001, .. })
        ));
    }

    #[test]
    fn test_start_measurement_selects_command() {
        assert_eq!(Command::start_measurement::<()>(MeasurementMode::O2, None).unwrap(), Command::StartO2);
        // Fraction is ignored (and not validated) outside the mix mode
        assert_eq!(Command::start_measurement::<()>(MeasurementMode::Air, Some(5000)).unwrap(), Command::StartAir);
        assert_eq!(
            Command::start_measurement::<()>(MeasurementMode::AirO2Mix, Some(210)).unwrap(),
            Command::StartAirO2Mix { o2_fraction_permille: 210 }
        );
        assert!(matches!(
            Command::start_measurement::<()>(MeasurementMode::AirO2Mix, None),
            Err(Sfm3019Error::MissingO2Fraction)
        ));
    }

    #[test]
    fn test_interpret_identifier() {
        let words = [0x0400, 0x0001, 0x0000, 0x0123, 0x4567, 0x89AB];
        let response = Command::ReadProductIdentifier.interpret(Some(&words[..])).unwrap();
        assert_eq!(
            response,
            Response::Identifier(Identifier { product_id: 0x0400_0001, serial_number: 0x0000_0123_4567_89AB })
        );
    }

    #[test]
    fn test_interpret_measurement_signed() {
        let response = Command::ReadMeasurement.interpret(Some(&[0xFF88, 0x0190][..])).unwrap();
        assert_eq!(response, Response::Measurement(RawMeasurement { flow: -120, temperature: 400 }));
    }

    #[test]
    fn test_interpret_unit_and_factors() {
        let cmd = Command::GetUnitAndFactors { mode: MeasurementMode::Air };
        let response = cmd.interpret(Some(&[0x0078, 0x5DC0, 0x0208][..])).unwrap();
        assert_eq!(
            response,
            Response::UnitAndFactors(Calibration { scale_factor: 120.0, offset: 24000.0, unit_code: 0x0208 })
        );
    }

    #[test]
    fn test_interpret_missing_or_short() {
        assert_eq!(Command::ReadMeasurement.interpret(None), Err(WordCodecError::NoData));
        assert_eq!(
            Command::ReadMeasurement.interpret(Some(&[0x0000][..])),
            Err(WordCodecError::ShortResponse { expected: 2, got: 1 })
        );
        assert_eq!(Command::StopMeasurement.interpret(None), Ok(Response::Empty));
    }
}
