//! Input events and the input source interface.

use crate::rig::driver::RigError;
use serde::{Deserialize, Serialize};

/// Symbolic input code.
///
/// Payload ranges: axes `AXIS_MIN..=AXIS_MAX`, triggers
/// `TRIGGER_MIN..=TRIGGER_MAX`, buttons 0 (release) / 1 (press).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputCode {
    /// Stick X axis.
    HorizontalAxis,
    /// Stick Y axis.
    VerticalAxis,
    /// Left analog trigger.
    LeftTrigger,
    /// Right analog trigger.
    RightTrigger,
    /// Toggle Mid ↔ Open.
    ModeToggle,
    /// Toggle Squint ↔ Mid.
    SquintToggle,
    /// Toggle Closed ↔ Mid.
    SleepToggle,
    /// Request a blink.
    ManualBlink,
    /// Shut the rig down.
    Exit,
}

impl InputCode {
    /// Whether this code carries a 0/1 button edge.
    pub const fn is_button(self) -> bool {
        matches!(
            self,
            Self::ModeToggle
                | Self::SquintToggle
                | Self::SleepToggle
                | Self::ManualBlink
                | Self::Exit
        )
    }
}

/// One discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// What changed.
    pub code: InputCode,
    /// New state/value.
    pub value: i32,
}

impl InputEvent {
    /// Create an event.
    pub const fn new(code: InputCode, value: i32) -> Self {
        Self { code, value }
    }

    /// Button press edge.
    pub const fn press(code: InputCode) -> Self {
        Self { code, value: 1 }
    }

    /// True for a button event with a press edge.
    pub const fn is_press(&self) -> bool {
        self.code.is_button() && self.value == 1
    }
}

/// A lazy, blocking sequence of input events.
///
/// `next_event` blocks until an event is available. `Ok(None)` means the
/// source is exhausted and will never produce another event. Errors are
/// transient; callers back off and call again.
pub trait InputSource: Send {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Block for the next event.
    fn next_event(&mut self) -> Result<Option<InputEvent>, RigError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edges() {
        assert!(InputEvent::press(InputCode::ManualBlink).is_press());
        assert!(!InputEvent::new(InputCode::ManualBlink, 0).is_press());
        // Analog codes never count as presses.
        assert!(!InputEvent::new(InputCode::LeftTrigger, 1).is_press());
    }

    #[test]
    fn code_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            code: InputCode,
        }
        let w: Wrapper = toml::from_str("code = \"squint_toggle\"").unwrap();
        assert_eq!(w.code, InputCode::SquintToggle);
    }
}
