//! Gaze tracking from stick axes.

use eye_common::consts::{AXIS_MAX, AXIS_MIN};
use eye_common::rig::channel::{Channel, RangeSpec, RangeTable, map_value};

/// Current gaze target, each axis within its channel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeState {
    /// Horizontal gaze angle.
    pub horizontal: f64,
    /// Vertical gaze angle.
    pub vertical: f64,
}

/// Holds the gaze target and derives the upper-lid vertical offset.
#[derive(Debug, Clone)]
pub struct GazeTracker {
    state: GazeState,
    horizontal: RangeSpec,
    vertical: RangeSpec,
    modifier: f64,
}

impl GazeTracker {
    /// Start centered on both axes.
    pub fn new(table: &RangeTable, vertical_lid_modifier: f64) -> Self {
        let horizontal = *table.spec(Channel::EyeHorizontal);
        let vertical = *table.spec(Channel::EyeVertical);
        Self {
            state: GazeState {
                horizontal: horizontal.center(),
                vertical: vertical.center(),
            },
            horizontal,
            vertical,
            modifier: vertical_lid_modifier,
        }
    }

    /// Current gaze.
    pub fn state(&self) -> GazeState {
        self.state
    }

    /// Re-center both axes. Returns the new state.
    pub fn center(&mut self) -> GazeState {
        self.state = GazeState {
            horizontal: self.horizontal.center(),
            vertical: self.vertical.center(),
        };
        self.state
    }

    /// Apply a raw stick X value. Returns the new horizontal angle.
    ///
    /// Stick left maps to `min`, stick right to `max`.
    pub fn set_horizontal_raw(&mut self, raw: i32) -> f64 {
        let angle = map_value(
            raw as f64,
            AXIS_MIN as f64,
            AXIS_MAX as f64,
            self.horizontal.min,
            self.horizontal.max,
        );
        self.state.horizontal = self.horizontal.clamp(angle);
        self.state.horizontal
    }

    /// Apply a raw stick Y value. Returns the new vertical angle.
    ///
    /// The stick Y axis grows downwards, so it maps onto `max..min`.
    pub fn set_vertical_raw(&mut self, raw: i32) -> f64 {
        let angle = map_value(
            raw as f64,
            AXIS_MIN as f64,
            AXIS_MAX as f64,
            self.vertical.max,
            self.vertical.min,
        );
        self.set_vertical(angle)
    }

    /// Set the vertical angle directly (clamped). Returns the stored angle.
    pub fn set_vertical(&mut self, angle: f64) -> f64 {
        self.state.vertical = self.vertical.clamp(angle);
        self.state.vertical
    }

    /// Offset applied to the upper lids:
    /// `((vertical - min) / (max - min) - 0.5) * K`.
    pub fn vertical_offset(&self) -> f64 {
        let range = self.vertical.max - self.vertical.min;
        ((self.state.vertical - self.vertical.min) / range - 0.5) * self.modifier
    }
}
