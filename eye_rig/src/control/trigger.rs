//! Trigger-pressure eyelid override.
//!
//! Each side's analog trigger can close that eye's lids directly. While the
//! pressure is at or above the release threshold the side is "engaged" and
//! mode/gaze logic leaves its lids alone.

use eye_common::consts::{TRIGGER_MAX, TRIGGER_MIN};
use eye_common::rig::channel::{LidRange, RangeTable, Side, map_value};

/// Upper and lower lid angles of one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideAngles {
    /// Upper lid angle.
    pub upper: f64,
    /// Lower lid angle.
    pub lower: f64,
}

/// What a pressure update asks the lids of that side to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerAction {
    /// Trigger engaged: drive both lids to these angles.
    Override(SideAngles),
    /// Trigger released: hand the side back to mode/gaze control.
    Release,
}

/// Per-side trigger pressure with release hysteresis.
#[derive(Debug, Clone)]
pub struct TriggerOverride {
    pressure: [u8; 2],
    release_threshold: u8,
}

impl TriggerOverride {
    /// Both triggers released.
    pub fn new(release_threshold: u8) -> Self {
        Self {
            pressure: [0; 2],
            release_threshold,
        }
    }

    fn slot(side: Side) -> usize {
        match side {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Last recorded pressure for a side.
    pub fn pressure(&self, side: Side) -> u8 {
        self.pressure[Self::slot(side)]
    }

    /// Whether a side is under trigger control.
    pub fn is_engaged(&self, side: Side) -> bool {
        self.pressure(side) >= self.release_threshold
    }

    /// Whether either side is under trigger control.
    pub fn any_engaged(&self) -> bool {
        Side::BOTH.iter().any(|&side| self.is_engaged(side))
    }

    /// Record a raw trigger value (clamped to 0..=255) and decide the action.
    pub fn set_pressure(&mut self, side: Side, raw: i32, table: &RangeTable) -> TriggerAction {
        self.pressure[Self::slot(side)] = raw.clamp(TRIGGER_MIN, TRIGGER_MAX) as u8;
        self.action(side, table)
    }

    /// Action implied by the currently recorded pressure.
    pub fn action(&self, side: Side, table: &RangeTable) -> TriggerAction {
        if self.is_engaged(side) {
            TriggerAction::Override(self.lid_angles(side, table))
        } else {
            TriggerAction::Release
        }
    }

    /// Map pressure onto each lid's own open → closed range.
    pub fn lid_angles(&self, side: Side, table: &RangeTable) -> SideAngles {
        let pressure = self.pressure(side) as f64;
        let map = |range: LidRange| {
            map_value(
                pressure,
                TRIGGER_MIN as f64,
                TRIGGER_MAX as f64,
                range.open,
                range.closed,
            )
        };
        SideAngles {
            upper: map(table.lid(side.upper())),
            lower: map(table.lid(side.lower())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eye_common::rig::config::RigConfig;

    fn table() -> RangeTable {
        RigConfig::default().range_table().unwrap()
    }

    #[test]
    fn below_threshold_releases() {
        let t = table();
        let mut triggers = TriggerOverride::new(10);
        assert_eq!(triggers.set_pressure(Side::Left, 9, &t), TriggerAction::Release);
        assert!(!triggers.is_engaged(Side::Left));
        assert_eq!(triggers.pressure(Side::Left), 9);
    }

    #[test]
    fn threshold_engages() {
        let t = table();
        let mut triggers = TriggerOverride::new(10);
        assert!(matches!(
            triggers.set_pressure(Side::Right, 10, &t),
            TriggerAction::Override(_)
        ));
        assert!(triggers.is_engaged(Side::Right));
        assert!(!triggers.is_engaged(Side::Left));
        assert!(triggers.any_engaged());
    }

    #[test]
    fn full_pressure_closes_each_lid_in_its_own_direction() {
        let t = table();
        let mut triggers = TriggerOverride::new(10);
        triggers.set_pressure(Side::Left, 255, &t);
        triggers.set_pressure(Side::Right, 255, &t);
        assert_eq!(
            triggers.lid_angles(Side::Left, &t),
            SideAngles {
                upper: 0.0,
                lower: 155.0
            }
        );
        assert_eq!(
            triggers.lid_angles(Side::Right, &t),
            SideAngles {
                upper: 80.0,
                lower: 145.0
            }
        );
    }

    #[test]
    fn partial_pressure_interpolates() {
        let t = table();
        let mut triggers = TriggerOverride::new(10);
        triggers.set_pressure(Side::Left, 51, &t);
        let angles = triggers.lid_angles(Side::Left, &t);
        assert!((angles.upper - 64.0).abs() < 1e-9);
        assert!((angles.lower - 147.0).abs() < 1e-9);
    }

    #[test]
    fn raw_values_are_clamped() {
        let t = table();
        let mut triggers = TriggerOverride::new(10);
        triggers.set_pressure(Side::Left, 1023, &t);
        assert_eq!(triggers.pressure(Side::Left), 255);
        triggers.set_pressure(Side::Left, -4, &t);
        assert_eq!(triggers.pressure(Side::Left), 0);
    }
}
