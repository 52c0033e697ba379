// src/device/sync_device/mod.rs

mod transaction;

use crate::common::{
    command::{Command, Response},
    error::Sfm3019Error,
    frame::WordCodec,
    hal_traits::BridgeTransport,
    types::{Calibration, FlowUnit, Identifier, Measurement, MeasurementMode, RawMeasurement},
};
use crate::device::config::DeviceConfig;

/// Lifecycle of a sensor session.
///
/// `Stopped` behaves like `Initialized` for every subsequent operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    Measuring(MeasurementMode),
    Stopped,
}

/// An SFM3019 sensor session for SYNCHRONOUS operations.
///
/// All I/O takes `&mut self`, so one session never has two commands in flight.
/// Use one session per physical sensor.
#[derive(Debug)]
pub struct Sfm3019<T>
where
    T: BridgeTransport,
{
    transport: T,
    config: DeviceConfig,
    codec: WordCodec,
    state: SessionState,
    calibration: Option<Calibration>,
}

impl<T> Sfm3019<T>
where
    T: BridgeTransport,
{
    pub fn new(transport: T, config: DeviceConfig) -> Self {
        Sfm3019 {
            transport,
            config,
            codec: WordCodec::SENSIRION,
            state: SessionState::Uninitialized,
            calibration: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Calibration read by the last successful `initialize`.
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Consumes the session and returns the transport.
    pub fn release(self) -> T {
        self.transport
    }

    // --- Public Blocking Methods ---

    /// Stops any running measurement and reads scale factor, offset and unit for `mode`.
    ///
    /// Must be called before measurements are read. Stopping is safe even if no
    /// measurement is running. A zero scale factor is rejected and the previous
    /// calibration, if any, is kept.
    pub fn initialize(&mut self, mode: MeasurementMode) -> Result<Calibration, Sfm3019Error<T::Error>> {
        self.stop_measurement()?;

        let calibration = match self.execute(&Command::GetUnitAndFactors { mode })? {
            Response::UnitAndFactors(calibration) => calibration,
            _ => return Err(Sfm3019Error::UnexpectedResponse),
        };
        if calibration.scale_factor == 0.0 {
            log::warn!("SFM3019 at {}: zero scale factor reported for {:?}", self.config.address, mode);
            return Err(Sfm3019Error::Precondition("sensor reported a zero scale factor"));
        }
        log::debug!(
            "SFM3019 at {} initialized for {:?}: scale {}, offset {}, unit {:#06x}",
            self.config.address,
            mode,
            calibration.scale_factor,
            calibration.offset,
            calibration.unit_code
        );

        self.calibration = Some(calibration);
        self.state = SessionState::Initialized;
        Ok(calibration)
    }

    /// Reads the product identifier and serial number.
    ///
    /// Use `Identifier::product_id_hex` / `Identifier::serial_number_hex` for the string form.
    pub fn read_identifier(&mut self) -> Result<Identifier, Sfm3019Error<T::Error>> {
        match self.execute(&Command::ReadProductIdentifier)? {
            Response::Identifier(identifier) => Ok(identifier),
            _ => Err(Sfm3019Error::UnexpectedResponse),
        }
    }

    /// Starts a continuous measurement.
    ///
    /// `o2_fraction_permille` is required for `AirO2Mix` and must be within 0..=1000;
    /// it is ignored for the other modes. Nothing is sent if validation fails.
    pub fn start_measurement(
        &mut self,
        mode: MeasurementMode,
        o2_fraction_permille: Option<i32>,
    ) -> Result<(), Sfm3019Error<T::Error>> {
        let command = Command::start_measurement::<T::Error>(mode, o2_fraction_permille)?;
        self.execute(&command)?;
        log::debug!("SFM3019 at {}: {:?} -> Measuring({:?})", self.config.address, self.state, mode);
        self.state = SessionState::Measuring(mode);
        Ok(())
    }

    /// Stops a continuous measurement. Always safe to call.
    pub fn stop_measurement(&mut self) -> Result<(), Sfm3019Error<T::Error>> {
        self.execute(&Command::StopMeasurement)?;
        log::debug!("SFM3019 at {}: {:?} -> Stopped", self.config.address, self.state);
        self.state = SessionState::Stopped;
        Ok(())
    }

    /// Reads one measurement without applying the calibration.
    pub fn read_measurement_raw(&mut self) -> Result<RawMeasurement, Sfm3019Error<T::Error>> {
        if !matches!(self.state, SessionState::Measuring(_)) {
            log::warn!(
                "SFM3019 at {}: reading measurement in state {:?}, values are not meaningful",
                self.config.address,
                self.state
            );
        }
        match self.execute(&Command::ReadMeasurement)? {
            Response::Measurement(raw) => Ok(raw),
            _ => Err(Sfm3019Error::UnexpectedResponse),
        }
    }

    /// Reads one measurement: flow in the sensor's flow unit, temperature in degrees Celsius.
    ///
    /// Fails with a precondition error if `initialize` has not succeeded yet.
    pub fn read_measurement(&mut self) -> Result<Measurement, Sfm3019Error<T::Error>> {
        let Some(calibration) = self.calibration else {
            return Err(Sfm3019Error::Precondition("sensor not initialized, calibration unknown"));
        };
        let raw = self.read_measurement_raw()?;
        Ok(calibration.convert(raw))
    }

    /// The flow unit reported during `initialize`, e.g. `"ml/min"`.
    pub fn flow_unit(&self) -> Result<FlowUnit, Sfm3019Error<T::Error>> {
        let Some(calibration) = self.calibration.as_ref() else {
            return Err(Sfm3019Error::Precondition("sensor not initialized, flow unit unknown"));
        };
        FlowUnit::from_code(calibration.unit_code as u16)
    }
}
