// src/device/config.rs

use crate::common::{address::I2cAddr, hal_traits::BridgePort, timing};

/// Connection settings of one sensor behind a bridge.
///
/// Frequency and supply voltage are not applied by this crate. They record what the
/// external bridge setup must configure on `port`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DeviceConfig {
    pub address: I2cAddr,
    pub port: BridgePort,
    pub i2c_frequency_hz: u32,
    pub supply_voltage: f32,
}

impl DeviceConfig {
    pub const fn new(address: I2cAddr, port: BridgePort) -> Self {
        DeviceConfig {
            address,
            port,
            i2c_frequency_hz: timing::DEFAULT_I2C_FREQUENCY_HZ,
            supply_voltage: timing::DEFAULT_SUPPLY_VOLTAGE,
        }
    }

    pub fn with_address(mut self, address: I2cAddr) -> Self {
        self.address = address;
        self
    }

    pub fn with_port(mut self, port: BridgePort) -> Self {
        self.port = port;
        self
    }

    pub fn with_i2c_frequency(mut self, hz: u32) -> Self {
        self.i2c_frequency_hz = hz;
        self
    }

    pub fn with_supply_voltage(mut self, volts: f32) -> Self {
        self.supply_voltage = volts;
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(I2cAddr::DEFAULT_ADDRESS, BridgePort::One)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.address.as_u8(), 0x2E);
        assert_eq!(config.port, BridgePort::One);
        assert_eq!(config.i2c_frequency_hz, 400_000);
        assert_eq!(config.supply_voltage, 3.3);
    }

    #[test]
    fn test_builder() {
        let config = DeviceConfig::default()
            .with_address(I2cAddr::new(0x28).unwrap())
            .with_port(BridgePort::Two)
            .with_i2c_frequency(100_000)
            .with_supply_voltage(5.0);
        assert_eq!(config.address.as_u8(), 0x28);
        assert_eq!(config.port.index(), 1);
        assert_eq!(config.i2c_frequency_hz, 100_000);
        assert_eq!(config.supply_voltage, 5.0);
    }
}
