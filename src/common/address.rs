// src/common/address.rs

use core::convert::TryFrom;
use core::fmt;

/// Error returned for an I2C address outside the 7-bit non-reserved range.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("Invalid 7-bit I2C address: {0:#04x}")]
pub struct InvalidAddress(pub u8);

/// A 7-bit I2C slave address.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct I2cAddr(u8);

impl I2cAddr {
    /// Factory default address of the SFM3019.
    pub const DEFAULT_ADDRESS: I2cAddr = I2cAddr(0x2E);

    /// Creates a new `I2cAddr` if `address` is a 7-bit address outside the
    /// reserved ranges (`0x00..=0x07` and `0x78..=0x7F`).
    pub const fn new(address: u8) -> Result<Self, InvalidAddress> {
        if Self::is_valid(address) {
            Ok(I2cAddr(address))
        } else {
            Err(InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid(address: u8) -> bool {
        matches!(address, 0x08..=0x77)
    }
}

impl Default for I2cAddr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u8> for I2cAddr {
    type Error = InvalidAddress;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<I2cAddr> for u8 {
    fn from(value: I2cAddr) -> Self {
        value.0
    }
}

impl fmt::Display for I2cAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
