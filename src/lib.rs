// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod device;

// Re-export key types for convenience
pub use common::{I2cAddr, Sfm3019Error};
pub use device::{DeviceConfig, Sfm3019};
