// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::{I2cAddr, InvalidAddress};

// From command.rs
pub use command::{Command, FrameSpec, Response};

// From crc.rs
pub use crc::{calculate_crc8, CrcCalculator, SENSIRION_CRC8};

// From error.rs
pub use error::{ChecksumError, Sfm3019Error, WordCodecError};

// From frame.rs
pub use frame::{OpcodeWidth, TxFrame, WordCodec, Words};

// From hal_traits.rs
pub use hal_traits::{BridgePort, BridgeTransport};

// From types.rs
pub use types::{
    int16, Calibration, FlowUnit, Identifier, Measurement, MeasurementMode, RawMeasurement, UnitTable,
};

// --- Feature-gated re-exports ---

// Direct embedded-hal bus adapter (from hal_traits.rs)
#[cfg(feature = "impl-native")]
pub use hal_traits::I2cTransport;
