//! Rig configuration types.
//!
//! `RigConfig` is loaded from `rig.toml`. Every section and field has a
//! default matching the calibrated rig, so an empty file (or no file at all)
//! yields a working configuration.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! service_name = "eye-rig-bench"
//!
//! [channels.left_upper_lid]
//! min = 0.0
//! max = 80.0
//! closed = "min"
//!
//! [eyelids]
//! vertical_lid_modifier = 0.8
//!
//! [eyelids.mid_closure]
//! left_upper = 0.5
//!
//! [blink]
//! hold_ms = 200
//! interval_min_s = 3.0
//! interval_max_s = 8.0
//! ```

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{CHANNEL_COUNT, DEFAULT_RELEASE_THRESHOLD, MAX_BLINK_INTERVAL_S};
use crate::rig::channel::{LidEnd, RangeSpec, RangeTable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete rig configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RigConfig {
    /// Logging and instance name.
    pub shared: SharedConfig,
    /// Per-channel calibration.
    pub channels: ChannelsConfig,
    /// Eyelid resting positions and gaze coupling.
    pub eyelids: EyelidConfig,
    /// Blink animation and scheduling timings.
    pub blink: BlinkConfig,
    /// Servo pulse calibration.
    pub servo: ServoConfig,
    /// Input handling.
    pub input: InputConfig,
}

impl RigConfig {
    /// Validate every section.
    ///
    /// # Validation Rules
    /// 1. Channel ranges non-empty, finite, lids declare their closed bound
    /// 2. Mid closure fractions within [0, 1]
    /// 3. Vertical lid modifier within [0, 1)
    /// 4. Release threshold within 1..=255
    /// 5. Hold and poll durations > 0, interval bounds ordered, positive and
    ///    at most `MAX_BLINK_INTERVAL_S`
    /// 6. Servo pulse bounds ordered, actuation range and frequency > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.range_table()?;
        self.eyelids.validate()?;
        self.blink.validate()?;
        self.servo.validate()?;
        Ok(())
    }

    /// Build the calibration table.
    pub fn range_table(&self) -> Result<RangeTable, ConfigError> {
        RangeTable::new(self.channels.specs())
    }
}

// ─── Channels ───────────────────────────────────────────────────────

/// Per-channel ranges, one table per channel in `rig.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelsConfig {
    /// Left lower lid (max closes).
    pub left_lower_lid: RangeSpec,
    /// Left upper lid (min closes).
    pub left_upper_lid: RangeSpec,
    /// Horizontal gaze (min = left, max = right).
    pub eye_horizontal: RangeSpec,
    /// Vertical gaze (min = down, max = up).
    pub eye_vertical: RangeSpec,
    /// Right upper lid (max closes).
    pub right_upper_lid: RangeSpec,
    /// Right lower lid (min closes).
    pub right_lower_lid: RangeSpec,
}

impl ChannelsConfig {
    /// Specs in hardware index order.
    pub fn specs(&self) -> [RangeSpec; CHANNEL_COUNT] {
        [
            self.left_lower_lid,
            self.left_upper_lid,
            self.eye_horizontal,
            self.eye_vertical,
            self.right_upper_lid,
            self.right_lower_lid,
        ]
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            left_lower_lid: RangeSpec::lid(145.0, 155.0, LidEnd::Max),
            left_upper_lid: RangeSpec::lid(0.0, 80.0, LidEnd::Min),
            eye_horizontal: RangeSpec::gaze(50.0, 130.0),
            eye_vertical: RangeSpec::gaze(0.0, 90.0),
            right_upper_lid: RangeSpec::lid(0.0, 80.0, LidEnd::Max),
            right_lower_lid: RangeSpec::lid(145.0, 155.0, LidEnd::Min),
        }
    }
}

// ─── Eyelids ────────────────────────────────────────────────────────

/// Per-lid fraction of the way from open (0.0) to closed (1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LidFractions {
    /// Left lower lid.
    pub left_lower: f64,
    /// Left upper lid.
    pub left_upper: f64,
    /// Right upper lid.
    pub right_upper: f64,
    /// Right lower lid.
    pub right_lower: f64,
}

impl LidFractions {
    /// Fractions in `Lid::ALL` order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.left_lower,
            self.left_upper,
            self.right_upper,
            self.right_lower,
        ]
    }
}

impl Default for LidFractions {
    fn default() -> Self {
        Self {
            left_lower: 0.1,
            left_upper: 0.5,
            right_upper: 0.5,
            right_lower: 0.1,
        }
    }
}

/// Eyelid behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EyelidConfig {
    /// Resting ("mid") closure per lid.
    pub mid_closure: LidFractions,
    /// How strongly vertical gaze moves the upper lids (K).
    pub vertical_lid_modifier: f64,
    /// Trigger pressure below which a trigger counts as released.
    pub release_threshold: u8,
}

impl Default for EyelidConfig {
    fn default() -> Self {
        Self {
            mid_closure: LidFractions::default(),
            vertical_lid_modifier: 0.8,
            release_threshold: DEFAULT_RELEASE_THRESHOLD,
        }
    }
}

impl EyelidConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for fraction in self.mid_closure.as_array() {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ConfigError::ValidationError(format!(
                    "mid_closure {fraction} outside [0, 1]"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.vertical_lid_modifier) {
            return Err(ConfigError::ValidationError(format!(
                "vertical_lid_modifier {} outside [0, 1)",
                self.vertical_lid_modifier
            )));
        }
        if self.release_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "release_threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Blink ──────────────────────────────────────────────────────────

/// Blink animation and auto-blink timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlinkConfig {
    /// How long the lids stay closed.
    pub hold_ms: u64,
    /// Auto-blink scheduler polling period.
    pub poll_ms: u64,
    /// Shortest random interval between blinks (seconds).
    pub interval_min_s: f64,
    /// Longest random interval between blinks (seconds).
    pub interval_max_s: f64,
    /// Shortest interval before the first blink after startup.
    pub initial_interval_min_s: f64,
    /// Longest interval before the first blink after startup.
    pub initial_interval_max_s: f64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            hold_ms: 200,
            poll_ms: 200,
            interval_min_s: 3.0,
            interval_max_s: 8.0,
            initial_interval_min_s: 4.0,
            initial_interval_max_s: 9.0,
        }
    }
}

impl BlinkConfig {
    /// Hold duration.
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    /// Scheduler polling period.
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hold_ms == 0 || self.poll_ms == 0 {
            return Err(ConfigError::ValidationError(
                "blink hold_ms and poll_ms must be greater than 0".to_string(),
            ));
        }
        check_interval("interval", self.interval_min_s, self.interval_max_s)?;
        check_interval(
            "initial_interval",
            self.initial_interval_min_s,
            self.initial_interval_max_s,
        )
    }
}

fn check_interval(name: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min > 0.0 && min <= max && max <= MAX_BLINK_INTERVAL_S) {
        return Err(ConfigError::ValidationError(format!(
            "blink {name} bounds invalid: min={min}, max={max} (limit {MAX_BLINK_INTERVAL_S}s)"
        )));
    }
    Ok(())
}

// ─── Servo / Input ──────────────────────────────────────────────────

/// Hobby servo pulse calibration shared by all channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServoConfig {
    /// Pulse width at 0°.
    pub min_pulse_us: u32,
    /// Pulse width at the end of the actuation range.
    pub max_pulse_us: u32,
    /// Mechanical actuation range in degrees.
    pub actuation_range_deg: f64,
    /// PWM frequency.
    pub frequency_hz: u32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2400,
            actuation_range_deg: 180.0,
            frequency_hz: 50,
        }
    }
}

impl ServoConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pulse_us >= self.max_pulse_us {
            return Err(ConfigError::ValidationError(format!(
                "servo pulse bounds inverted: {}..{}",
                self.min_pulse_us, self.max_pulse_us
            )));
        }
        if self.actuation_range_deg <= 0.0 || self.frequency_hz == 0 {
            return Err(ConfigError::ValidationError(
                "servo actuation_range_deg and frequency_hz must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Pause after an input read error before retrying.
    pub error_backoff_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            error_backoff_ms: 100,
        }
    }
}

impl InputConfig {
    /// Backoff as a `Duration`.
    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}
