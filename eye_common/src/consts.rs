//! System-wide constants for the eye rig workspace.
//!
//! Single source of truth for the fixed topology and input value ranges.

use static_assertions::const_assert;

/// Number of actuator channels on the rig.
pub const CHANNEL_COUNT: usize = 6;

/// Number of eyelid actuators (upper + lower, both eyes).
pub const LID_COUNT: usize = 4;

/// Lowest raw value reported by a stick axis.
pub const AXIS_MIN: i32 = -32768;

/// Highest raw value reported by a stick axis.
pub const AXIS_MAX: i32 = 32767;

/// Fully released trigger.
pub const TRIGGER_MIN: i32 = 0;

/// Fully pressed trigger.
pub const TRIGGER_MAX: i32 = 255;

/// Trigger pressure below which a trigger counts as released.
pub const DEFAULT_RELEASE_THRESHOLD: u8 = 10;

/// Longest blink interval a config may ask for, in seconds.
pub const MAX_BLINK_INTERVAL_S: f64 = 3600.0;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/eye_rig/rig.toml";

/// Canonical service name (used for logging).
pub const DEFAULT_SERVICE_NAME: &str = "eye_rig";

const_assert!(LID_COUNT < CHANNEL_COUNT);
const_assert!(AXIS_MIN < AXIS_MAX);
const_assert!((DEFAULT_RELEASE_THRESHOLD as i32) < TRIGGER_MAX);
