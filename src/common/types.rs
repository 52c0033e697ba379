// src/common/types.rs

use core::fmt::{self, Write};

use super::error::Sfm3019Error;

/// Interprets an unsigned 16-bit word as a two's-complement signed value.
#[inline]
pub const fn int16(word: u16) -> i16 {
    word as i16
}

// --- Measurement Modes ---

/// Gas the sensor is calibrated for during a continuous measurement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum MeasurementMode {
    O2,
    #[default]
    Air,
    AirO2Mix,
}

impl MeasurementMode {
    /// Opcode of the "start continuous measurement" command for this gas.
    ///
    /// Also used as the argument of "get unit and scale factors".
    pub const fn start_opcode(&self) -> u16 {
        match self {
            MeasurementMode::O2 => 0x3603,
            MeasurementMode::Air => 0x3608,
            MeasurementMode::AirO2Mix => 0x3632,
        }
    }
}

// --- Identification ---

/// Product identifier and serial number read from the sensor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Identifier {
    pub product_id: u32,
    pub serial_number: u64,
}

impl Identifier {
    /// Product identifier as 8 uppercase hex digits.
    pub fn product_id_hex(&self) -> heapless::String<8> {
        let mut s = heapless::String::new();
        // 8 hex digits always fit
        let _ = write!(s, "{:08X}", self.product_id);
        s
    }

    /// Serial number as 16 uppercase hex digits.
    pub fn serial_number_hex(&self) -> heapless::String<16> {
        let mut s = heapless::String::new();
        let _ = write!(s, "{:016X}", self.serial_number);
        s
    }
}

// --- Measurement Data ---

/// Signed raw values as returned by "read measurement".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RawMeasurement {
    pub flow: i16,
    pub temperature: i16,
}

/// Scale factor, offset and unit programmed into the sensor for one measurement mode.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Calibration {
    pub scale_factor: f32,
    pub offset: f32,
    pub unit_code: i16,
}

/// Temperature raw value divisor (degrees Celsius).
pub const TEMPERATURE_SCALE_FACTOR: f32 = 200.0;

impl Calibration {
    /// Applies offset and scaling to a raw measurement.
    ///
    /// A zero scale factor yields an infinite or NaN flow. `Sfm3019::initialize`
    /// never stores such a calibration.
    pub fn convert(&self, raw: RawMeasurement) -> Measurement {
        Measurement {
            flow: (f32::from(raw.flow) - self.offset) / self.scale_factor,
            temperature: f32::from(raw.temperature) / TEMPERATURE_SCALE_FACTOR,
        }
    }

    /// Decodes the stored unit code.
    pub fn flow_unit(&self) -> Result<FlowUnit, Sfm3019Error> {
        FlowUnit::from_code(self.unit_code as u16)
    }
}

/// Converted flow (in the sensor's flow unit) and temperature (degrees Celsius).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurement {
    pub flow: f32,
    pub temperature: f32,
}

// --- Flow Unit ---

/// The three lookup tables a flow unit code is decomposed into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnitTable {
    Prefix,
    Unit,
    TimeBase,
}

impl fmt::Display for UnitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitTable::Prefix => write!(f, "flow unit prefix"),
            UnitTable::Unit => write!(f, "flow unit"),
            UnitTable::TimeBase => write!(f, "flow time base"),
        }
    }
}

fn lookup_prefix(code: u8) -> Option<&'static str> {
    Some(match code {
        3 => "n",
        4 => "u",
        5 => "m",
        6 => "c",
        7 => "d",
        8 => "",
        9 => "d",
        10 => "h",
        11 => "K",
        12 => "M",
        13 => "G",
        _ => return None,
    })
}

fn lookup_unit(code: u8) -> Option<&'static str> {
    Some(match code {
        0 => "sl(0)",
        1 => "sl(20)",
        2 => "sl(15)",
        3 => "sl(25)",
        8 => "l",
        9 => "g",
        _ => return None,
    })
}

fn lookup_time_base(code: u8) -> Option<&'static str> {
    Some(match code {
        0 => "",
        1 => "/us",
        2 => "/ms",
        3 => "/s",
        4 => "/min",
        5 => "/h",
        6 => "/d",
        _ => return None,
    })
}

/// Decoded flow unit: bits [3:0] prefix, bits [7:4] unit, bits [11:8] time base.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FlowUnit {
    code: u16,
    prefix: &'static str,
    unit: &'static str,
    time_base: &'static str,
}

impl FlowUnit {
    /// Decodes a unit code, failing for any nibble without a table entry.
    pub fn from_code<E: fmt::Debug>(code: u16) -> Result<Self, Sfm3019Error<E>> {
        let prefix_code = (code & 0xF) as u8;
        let unit_code = ((code >> 4) & 0xF) as u8;
        let time_code = ((code >> 8) & 0xF) as u8;

        let prefix = lookup_prefix(prefix_code)
            .ok_or(Sfm3019Error::<E>::Lookup { table: UnitTable::Prefix, code: prefix_code })?;
        let unit = lookup_unit(unit_code)
            .ok_or(Sfm3019Error::<E>::Lookup { table: UnitTable::Unit, code: unit_code })?;
        let time_base = lookup_time_base(time_code)
            .ok_or(Sfm3019Error::<E>::Lookup { table: UnitTable::TimeBase, code: time_code })?;

        Ok(FlowUnit { code, prefix, unit, time_base })
    }

    #[inline]
    pub const fn code(&self) -> u16 {
        self.code
    }

    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub const fn unit(&self) -> &'static str {
        self.unit
    }

    pub const fn time_base(&self) -> &'static str {
        self.time_base
    }

    /// The unit as a display string, e.g. `"ml/min"`.
    pub fn as_string(&self) -> heapless::String<16> {
        let mut s = heapless::String::new();
        // Longest combination ("G" + "sl(20)" + "/min") is 11 bytes
        let _ = write!(s, "{}", self);
        s
    }
}

impl fmt::Display for FlowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.unit, self.time_base)
    }
}
