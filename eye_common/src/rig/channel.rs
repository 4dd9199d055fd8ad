//! Actuator channels and per-channel calibration.
//!
//! This module defines:
//! - `Channel` - The six fixed actuator outputs of the rig
//! - `Side` / `Lid` - Eyelid addressing helpers
//! - `RangeSpec` - Per-channel logical angle bounds
//! - `RangeTable` - Calibration for the whole rig, built from config
//! - `map_value` - Affine interpolation used throughout

use crate::config::ConfigError;
use crate::consts::{CHANNEL_COUNT, LID_COUNT};
use serde::{Deserialize, Serialize};

/// Map a value from one range to another.
///
/// Plain affine interpolation. The result is **not** clamped; callers clamp
/// through the range table before commanding an actuator.
#[inline]
pub fn map_value(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

// ─── Channels ───────────────────────────────────────────────────────

/// One of the six addressable actuator outputs.
///
/// Discriminants are the hardware output indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Channel {
    /// Left eye, lower lid.
    LeftLowerLid = 0,
    /// Left eye, upper lid.
    LeftUpperLid = 1,
    /// Horizontal gaze (both eyeballs).
    EyeHorizontal = 2,
    /// Vertical gaze (both eyeballs).
    EyeVertical = 3,
    /// Right eye, upper lid.
    RightUpperLid = 4,
    /// Right eye, lower lid.
    RightLowerLid = 5,
}

impl Channel {
    /// All channels in hardware index order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::LeftLowerLid,
        Channel::LeftUpperLid,
        Channel::EyeHorizontal,
        Channel::EyeVertical,
        Channel::RightUpperLid,
        Channel::RightLowerLid,
    ];

    /// Convert from a raw output index. Returns `None` for unknown channels.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::LeftLowerLid),
            1 => Some(Self::LeftUpperLid),
            2 => Some(Self::EyeHorizontal),
            3 => Some(Self::EyeVertical),
            4 => Some(Self::RightUpperLid),
            5 => Some(Self::RightLowerLid),
            _ => None,
        }
    }

    /// Hardware output index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this channel drives an eyelid.
    #[inline]
    pub const fn is_lid(self) -> bool {
        !matches!(self, Self::EyeHorizontal | Self::EyeVertical)
    }

    /// Short name used in logs and config tables.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftLowerLid => "left_lower_lid",
            Self::LeftUpperLid => "left_upper_lid",
            Self::EyeHorizontal => "eye_horizontal",
            Self::EyeVertical => "eye_vertical",
            Self::RightUpperLid => "right_upper_lid",
            Self::RightLowerLid => "right_lower_lid",
        }
    }
}

/// Which eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left eye.
    Left,
    /// Right eye.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Upper lid of this side.
    #[inline]
    pub const fn upper(self) -> Lid {
        match self {
            Self::Left => Lid::LeftUpper,
            Self::Right => Lid::RightUpper,
        }
    }

    /// Lower lid of this side.
    #[inline]
    pub const fn lower(self) -> Lid {
        match self {
            Self::Left => Lid::LeftLower,
            Self::Right => Lid::RightLower,
        }
    }

    /// Lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// One of the four eyelid actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Lid {
    /// Left lower lid.
    LeftLower = 0,
    /// Left upper lid.
    LeftUpper = 1,
    /// Right upper lid.
    RightUpper = 2,
    /// Right lower lid.
    RightLower = 3,
}

impl Lid {
    /// All lids in command order.
    pub const ALL: [Lid; LID_COUNT] = [
        Lid::LeftLower,
        Lid::LeftUpper,
        Lid::RightUpper,
        Lid::RightLower,
    ];

    /// Actuator channel driving this lid.
    #[inline]
    pub const fn channel(self) -> Channel {
        match self {
            Self::LeftLower => Channel::LeftLowerLid,
            Self::LeftUpper => Channel::LeftUpperLid,
            Self::RightUpper => Channel::RightUpperLid,
            Self::RightLower => Channel::RightLowerLid,
        }
    }

    /// Eye this lid belongs to.
    #[inline]
    pub const fn side(self) -> Side {
        match self {
            Self::LeftLower | Self::LeftUpper => Side::Left,
            Self::RightUpper | Self::RightLower => Side::Right,
        }
    }

    /// Position in `Lid::ALL`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ─── Calibration ────────────────────────────────────────────────────

/// Which bound of a lid channel is the fully-closed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LidEnd {
    /// `min` closes the lid, `max` opens it.
    Min,
    /// `max` closes the lid, `min` opens it.
    Max,
}

/// Logical angle bounds of one channel.
///
/// `min`/`max` keep the orientation the mechanism was calibrated with;
/// they are not required to be ordered. For lid channels `closed` names the
/// bound that closes the lid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// Calibrated minimum angle.
    pub min: f64,
    /// Calibrated maximum angle.
    pub max: f64,
    /// Closed bound (lid channels only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<LidEnd>,
}

impl RangeSpec {
    /// Range for a gaze channel.
    pub const fn gaze(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            closed: None,
        }
    }

    /// Range for a lid channel.
    pub const fn lid(min: f64, max: f64, closed: LidEnd) -> Self {
        Self {
            min,
            max,
            closed: Some(closed),
        }
    }

    /// Lower clamp bound.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.min.min(self.max)
    }

    /// Upper clamp bound.
    #[inline]
    pub fn hi(&self) -> f64 {
        self.min.max(self.max)
    }

    /// Width of the range (always positive for a valid spec).
    #[inline]
    pub fn span(&self) -> f64 {
        (self.max - self.min).abs()
    }

    /// Midpoint between the two bounds.
    #[inline]
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Clamp `angle` into `[lo, hi]`.
    #[inline]
    pub fn clamp(&self, angle: f64) -> f64 {
        angle.clamp(self.lo(), self.hi())
    }
}

/// Open and closed angles of a lid, in that lid's own orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidRange {
    /// Fully open angle.
    pub open: f64,
    /// Fully closed angle.
    pub closed: f64,
}

impl LidRange {
    /// Angle at `fraction` of the way from open (0.0) to closed (1.0).
    #[inline]
    pub fn closure(&self, fraction: f64) -> f64 {
        self.open + (self.closed - self.open) * fraction
    }
}

/// Calibration for all six channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    specs: [RangeSpec; CHANNEL_COUNT],
    lids: [LidRange; LID_COUNT],
}

impl RangeTable {
    /// Build a table from per-channel specs in hardware index order.
    ///
    /// # Errors
    /// `ConfigError::ValidationError` if a range is empty, not finite, or a lid
    /// channel has no closed bound.
    pub fn new(specs: [RangeSpec; CHANNEL_COUNT]) -> Result<Self, ConfigError> {
        for channel in Channel::ALL {
            let spec = &specs[channel.index()];
            if !spec.min.is_finite() || !spec.max.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{}: bounds must be finite",
                    channel.as_str()
                )));
            }
            if spec.min == spec.max {
                return Err(ConfigError::ValidationError(format!(
                    "{}: min and max must differ (both {})",
                    channel.as_str(),
                    spec.min
                )));
            }
            if channel.is_lid() && spec.closed.is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "{}: lid channel needs `closed = \"min\"|\"max\"`",
                    channel.as_str()
                )));
            }
        }

        let lids = Lid::ALL.map(|lid| {
            let spec = &specs[lid.channel().index()];
            match spec.closed {
                Some(LidEnd::Max) => LidRange {
                    open: spec.min,
                    closed: spec.max,
                },
                _ => LidRange {
                    open: spec.max,
                    closed: spec.min,
                },
            }
        });

        Ok(Self { specs, lids })
    }

    /// Calibrated range of a channel.
    #[inline]
    pub fn spec(&self, channel: Channel) -> &RangeSpec {
        &self.specs[channel.index()]
    }

    /// Calibrated range by raw output index. `None` for an unknown channel.
    #[inline]
    pub fn spec_by_index(&self, index: u8) -> Option<&RangeSpec> {
        Channel::from_u8(index).map(|c| self.spec(c))
    }

    /// Open/closed geometry of a lid.
    #[inline]
    pub fn lid(&self, lid: Lid) -> LidRange {
        self.lids[lid.index()]
    }

    /// Clamp an angle into a channel's range.
    #[inline]
    pub fn clamp(&self, channel: Channel, angle: f64) -> f64 {
        self.spec(channel).clamp(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig_specs() -> [RangeSpec; CHANNEL_COUNT] {
        [
            RangeSpec::lid(145.0, 155.0, LidEnd::Max),
            RangeSpec::lid(0.0, 80.0, LidEnd::Min),
            RangeSpec::gaze(50.0, 130.0),
            RangeSpec::gaze(0.0, 90.0),
            RangeSpec::lid(0.0, 80.0, LidEnd::Max),
            RangeSpec::lid(145.0, 155.0, LidEnd::Min),
        ]
    }

    #[test]
    fn map_value_interpolates_and_extrapolates() {
        assert_eq!(map_value(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(map_value(0.0, 0.0, 255.0, 80.0, 0.0), 80.0);
        assert_eq!(map_value(255.0, 0.0, 255.0, 80.0, 0.0), 0.0);
        // No clamping.
        assert_eq!(map_value(20.0, 0.0, 10.0, 0.0, 100.0), 200.0);
    }

    #[test]
    fn channel_from_u8_roundtrip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_u8(channel as u8), Some(channel));
        }
        assert_eq!(Channel::from_u8(6), None);
        assert_eq!(Channel::from_u8(255), None);
    }

    #[test]
    fn lid_channel_classification() {
        assert!(Channel::LeftUpperLid.is_lid());
        assert!(Channel::RightLowerLid.is_lid());
        assert!(!Channel::EyeHorizontal.is_lid());
        assert!(!Channel::EyeVertical.is_lid());
        for lid in Lid::ALL {
            assert!(lid.channel().is_lid());
        }
    }

    #[test]
    fn range_spec_clamps_reversed_bounds() {
        let spec = RangeSpec::gaze(130.0, 50.0);
        assert_eq!(spec.lo(), 50.0);
        assert_eq!(spec.hi(), 130.0);
        assert_eq!(spec.clamp(10.0), 50.0);
        assert_eq!(spec.clamp(200.0), 130.0);
        assert_eq!(spec.clamp(90.0), 90.0);
    }

    #[test]
    fn lid_geometry_follows_closed_end() {
        let table = RangeTable::new(rig_specs()).unwrap();
        assert_eq!(
            table.lid(Lid::LeftLower),
            LidRange {
                open: 145.0,
                closed: 155.0
            }
        );
        assert_eq!(
            table.lid(Lid::LeftUpper),
            LidRange {
                open: 80.0,
                closed: 0.0
            }
        );
        assert_eq!(
            table.lid(Lid::RightUpper),
            LidRange {
                open: 0.0,
                closed: 80.0
            }
        );
        assert_eq!(
            table.lid(Lid::RightLower),
            LidRange {
                open: 155.0,
                closed: 145.0
            }
        );
    }

    #[test]
    fn closure_fraction() {
        let range = LidRange {
            open: 80.0,
            closed: 0.0,
        };
        assert_eq!(range.closure(0.0), 80.0);
        assert_eq!(range.closure(0.5), 40.0);
        assert_eq!(range.closure(1.0), 0.0);
    }

    #[test]
    fn table_rejects_empty_range() {
        let mut specs = rig_specs();
        specs[2] = RangeSpec::gaze(90.0, 90.0);
        assert!(matches!(
            RangeTable::new(specs),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn table_rejects_lid_without_closed_end() {
        let mut specs = rig_specs();
        specs[1].closed = None;
        assert!(RangeTable::new(specs).is_err());
    }

    #[test]
    fn spec_by_index_unknown_channel() {
        let table = RangeTable::new(rig_specs()).unwrap();
        assert!(table.spec_by_index(3).is_some());
        assert!(table.spec_by_index(9).is_none());
    }
}
