// src/common/timing.rs

use core::time::Duration;

// Values follow the SFM3019 datasheet, section 6. The bridge applies them as a
// read timeout, see `FrameSpec::bridge_timeout`.

// === Command Timing ===

/// Time after a start command before the first measurement can be read.
pub const MEASUREMENT_STARTUP_DELAY: Duration = Duration::from_millis(12);
/// Processing time of stop and "get unit and factors".
pub const COMMAND_DELAY: Duration = Duration::from_micros(500);
/// The SFM3019 does not stretch the clock.
pub const CLOCK_STRETCH_TIMEOUT: Duration = Duration::ZERO;

// === Bridge Defaults ===
// Informational: the bridge itself is configured outside this crate.

/// Default I2C clock frequency.
pub const DEFAULT_I2C_FREQUENCY_HZ: u32 = 400_000;
/// Default supply voltage of the bridge port.
pub const DEFAULT_SUPPLY_VOLTAGE: f32 = 3.3;
