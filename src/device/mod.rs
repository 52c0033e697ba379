// src/device/mod.rs

pub mod config;
pub mod sync_device;

pub use config::DeviceConfig;
pub use sync_device::{SessionState, Sfm3019};
