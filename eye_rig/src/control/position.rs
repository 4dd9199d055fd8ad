//! Eyelid modes and base lid positions.
//!
//! `PositionModel` is pure: for an `EyelidMode` and a vertical gaze offset it
//! returns the four lid targets, before any trigger override.

use eye_common::consts::LID_COUNT;
use eye_common::rig::channel::{Lid, RangeTable, Side};
use eye_common::rig::config::LidFractions;
use std::ops::{Index, IndexMut};

/// Discrete eyelid disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EyelidMode {
    /// Lids fully open.
    Open,
    /// Resting position.
    #[default]
    Mid,
    /// Halfway between Mid and Closed.
    Squint,
    /// Lids fully closed.
    Closed,
}

impl EyelidMode {
    /// Mode-toggle button: Mid ↔ Open (any other mode opens).
    pub const fn toggled_open(self) -> Self {
        match self {
            Self::Open => Self::Mid,
            _ => Self::Open,
        }
    }

    /// Squint-toggle button: Squint ↔ Mid.
    pub const fn toggled_squint(self) -> Self {
        match self {
            Self::Squint => Self::Mid,
            _ => Self::Squint,
        }
    }

    /// Sleep-toggle button: Closed ↔ Mid.
    pub const fn toggled_sleep(self) -> Self {
        match self {
            Self::Closed => Self::Mid,
            _ => Self::Closed,
        }
    }

    /// Lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Mid => "mid",
            Self::Squint => "squint",
            Self::Closed => "closed",
        }
    }
}

/// Target angles of the four lids, indexed by `Lid`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LidAngles([f64; LID_COUNT]);

impl LidAngles {
    /// Angles in `Lid::ALL` order.
    pub const fn new(angles: [f64; LID_COUNT]) -> Self {
        Self(angles)
    }

    /// `(lid, angle)` pairs in command order.
    pub fn iter(&self) -> impl Iterator<Item = (Lid, f64)> + '_ {
        Lid::ALL.iter().map(|&lid| (lid, self.0[lid.index()]))
    }
}

impl Index<Lid> for LidAngles {
    type Output = f64;

    fn index(&self, lid: Lid) -> &f64 {
        &self.0[lid.index()]
    }
}

impl IndexMut<Lid> for LidAngles {
    fn index_mut(&mut self, lid: Lid) -> &mut f64 {
        &mut self.0[lid.index()]
    }
}

/// Per-mode lid positions derived from the range table.
#[derive(Debug, Clone)]
pub struct PositionModel {
    table: RangeTable,
    mid: LidAngles,
    squint: LidAngles,
}

impl PositionModel {
    /// Precompute Mid and Squint positions.
    ///
    /// Mid is `mid_closure` of the way from open to closed for each lid;
    /// Squint sits halfway between Mid and the closed bound.
    pub fn new(table: RangeTable, mid_closure: &LidFractions) -> Self {
        let fractions = mid_closure.as_array();
        let mut mid = LidAngles::default();
        let mut squint = LidAngles::default();
        for lid in Lid::ALL {
            let range = table.lid(lid);
            mid[lid] = range.closure(fractions[lid.index()]);
            squint[lid] = (mid[lid] + range.closed) / 2.0;
        }
        Self { table, mid, squint }
    }

    /// Calibration table.
    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    /// Base angles for a mode, without gaze influence.
    pub fn base(&self, mode: EyelidMode) -> LidAngles {
        match mode {
            EyelidMode::Open => LidAngles(Lid::ALL.map(|lid| self.table.lid(lid).open)),
            EyelidMode::Closed => LidAngles(Lid::ALL.map(|lid| self.table.lid(lid).closed)),
            EyelidMode::Mid => self.mid,
            EyelidMode::Squint => self.squint,
        }
    }

    /// Upper lid angle for `side` with the vertical gaze offset applied.
    ///
    /// A positive offset (looking up) moves the lid towards open by
    /// `span * offset`; the direction follows the lid's own calibration, so
    /// the two upper lids move in opposite angular sense.
    pub fn upper_with_offset(&self, side: Side, base: f64, offset: f64) -> f64 {
        let lid = side.upper();
        let range = self.table.lid(lid);
        let span = self.table.spec(lid.channel()).span();
        base + (range.open - range.closed).signum() * span * offset
    }

    /// Mode base positions with the gaze offset applied to both upper lids.
    pub fn targets(&self, mode: EyelidMode, offset: f64) -> LidAngles {
        let mut angles = self.base(mode);
        for side in Side::BOTH {
            let upper = side.upper();
            angles[upper] = self.upper_with_offset(side, angles[upper], offset);
        }
        angles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eye_common::rig::config::RigConfig;

    fn model() -> PositionModel {
        let config = RigConfig::default();
        PositionModel::new(config.range_table().unwrap(), &config.eyelids.mid_closure)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn closed_and_open_use_channel_specific_bounds() {
        let m = model();
        let closed = m.base(EyelidMode::Closed);
        assert_eq!(closed[Lid::LeftLower], 155.0);
        assert_eq!(closed[Lid::LeftUpper], 0.0);
        assert_eq!(closed[Lid::RightUpper], 80.0);
        assert_eq!(closed[Lid::RightLower], 145.0);

        let open = m.base(EyelidMode::Open);
        assert_eq!(open[Lid::LeftLower], 145.0);
        assert_eq!(open[Lid::LeftUpper], 80.0);
        assert_eq!(open[Lid::RightUpper], 0.0);
        assert_eq!(open[Lid::RightLower], 155.0);
    }

    #[test]
    fn mid_matches_calibrated_rest() {
        let mid = model().base(EyelidMode::Mid);
        assert_close(mid[Lid::LeftLower], 146.0);
        assert_close(mid[Lid::LeftUpper], 40.0);
        assert_close(mid[Lid::RightUpper], 40.0);
        assert_close(mid[Lid::RightLower], 154.0);
    }

    #[test]
    fn squint_is_halfway_between_mid_and_closed() {
        let squint = model().base(EyelidMode::Squint);
        assert_close(squint[Lid::LeftLower], 150.5);
        assert_close(squint[Lid::LeftUpper], 20.0);
        assert_close(squint[Lid::RightUpper], 60.0);
        assert_close(squint[Lid::RightLower], 149.5);
    }

    #[test]
    fn base_is_idempotent() {
        let m = model();
        for mode in [
            EyelidMode::Open,
            EyelidMode::Mid,
            EyelidMode::Squint,
            EyelidMode::Closed,
        ] {
            assert_eq!(m.targets(mode, 0.2), m.targets(mode, 0.2));
        }
    }

    #[test]
    fn offset_moves_upper_lids_in_opposite_sense() {
        let m = model();
        let offset: f64 = ((85.0 - 0.0) / 90.0 - 0.5) * 0.8;
        assert!((offset - 0.355_555).abs() < 1e-6);

        let t = m.targets(EyelidMode::Mid, offset);
        assert_close(t[Lid::LeftUpper], 40.0 + 80.0 * offset);
        assert_close(t[Lid::RightUpper], 40.0 - 80.0 * offset);
        // Lower lids untouched.
        assert_close(t[Lid::LeftLower], 146.0);
        assert_close(t[Lid::RightLower], 154.0);
    }

    #[test]
    fn mode_toggles() {
        assert_eq!(EyelidMode::Mid.toggled_open(), EyelidMode::Open);
        assert_eq!(EyelidMode::Open.toggled_open(), EyelidMode::Mid);
        assert_eq!(EyelidMode::Squint.toggled_open(), EyelidMode::Open);
        assert_eq!(EyelidMode::Mid.toggled_squint(), EyelidMode::Squint);
        assert_eq!(EyelidMode::Squint.toggled_squint(), EyelidMode::Mid);
        assert_eq!(EyelidMode::Open.toggled_sleep(), EyelidMode::Closed);
        assert_eq!(EyelidMode::Closed.toggled_sleep(), EyelidMode::Mid);
        assert_eq!(EyelidMode::default(), EyelidMode::Mid);
    }
}
