//! Linux game controller input via evdev.
//!
//! Translates kernel absolute-axis and key events into rig `InputEvent`s.
//! Axis ranges are passed through unchanged; the rig expects the common
//! signed 16-bit stick range and 0-255 triggers.

use eye_common::rig::driver::RigError;
use eye_common::rig::input::{InputCode, InputEvent, InputSource};
use evdev::{AbsoluteAxisType, Device, InputEventKind, Key};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info};

const AXES: [(AbsoluteAxisType, InputCode); 4] = [
    (AbsoluteAxisType::ABS_X, InputCode::HorizontalAxis),
    (AbsoluteAxisType::ABS_Y, InputCode::VerticalAxis),
    (AbsoluteAxisType::ABS_Z, InputCode::LeftTrigger),
    (AbsoluteAxisType::ABS_RZ, InputCode::RightTrigger),
];

const BUTTONS: [(Key, InputCode); 5] = [
    (Key::BTN_TR, InputCode::ModeToggle),
    (Key::BTN_TL, InputCode::SquintToggle),
    (Key::BTN_THUMBR, InputCode::SleepToggle),
    (Key::BTN_THUMBL, InputCode::ManualBlink),
    (Key::BTN_SELECT, InputCode::Exit),
];

fn translate(kind: InputEventKind, value: i32) -> Option<InputEvent> {
    let code = match kind {
        InputEventKind::AbsAxis(axis) => AXES.iter().find(|(a, _)| *a == axis).map(|(_, c)| *c),
        InputEventKind::Key(key) => BUTTONS.iter().find(|(k, _)| *k == key).map(|(_, c)| *c),
        _ => None,
    }?;
    Some(InputEvent::new(code, value))
}

/// Game controller opened through `/dev/input/event*`.
pub struct GamepadInput {
    name: String,
    device: Device,
    pending: VecDeque<InputEvent>,
}

impl GamepadInput {
    /// Open a specific event device.
    ///
    /// # Errors
    /// `RigError::InputError` if the device cannot be opened.
    pub fn open(path: &Path) -> Result<Self, RigError> {
        let device = Device::open(path).map_err(|e| {
            RigError::InputError(format!("failed to open {}: {}", path.display(), e))
        })?;
        let name = device.name().unwrap_or("gamepad").to_string();
        info!("Opened input device {} ({})", name, path.display());
        Ok(Self {
            name,
            device,
            pending: VecDeque::new(),
        })
    }

    /// Open the first device that reports a stick X axis and the exit button.
    ///
    /// # Errors
    /// `RigError::InputError` if no such device is present.
    pub fn discover() -> Result<Self, RigError> {
        for (path, device) in evdev::enumerate() {
            let has_stick = device
                .supported_absolute_axes()
                .is_some_and(|axes| axes.contains(AbsoluteAxisType::ABS_X));
            let has_select = device
                .supported_keys()
                .is_some_and(|keys| keys.contains(Key::BTN_SELECT));
            if has_stick && has_select {
                debug!("Discovered gamepad at {}", path.display());
                return Self::open(&path);
            }
        }
        Err(RigError::InputError("no gamepad found".to_string()))
    }
}

impl InputSource for GamepadInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_event(&mut self) -> Result<Option<InputEvent>, RigError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            let events = self
                .device
                .fetch_events()
                .map_err(|e| RigError::InputError(format!("{}: {}", self.name, e)))?;
            self.pending
                .extend(events.filter_map(|ev| translate(ev.kind(), ev.value())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_axes_and_buttons() {
        assert_eq!(
            translate(InputEventKind::AbsAxis(AbsoluteAxisType::ABS_RZ), 200),
            Some(InputEvent::new(InputCode::RightTrigger, 200))
        );
        assert_eq!(
            translate(InputEventKind::Key(Key::BTN_THUMBL), 1),
            Some(InputEvent::press(InputCode::ManualBlink))
        );
        assert_eq!(translate(InputEventKind::Key(Key::BTN_SOUTH), 1), None);
    }
}
