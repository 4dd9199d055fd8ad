//! Scripted input.
//!
//! Replays a fixed list of events, each after an optional delay. Scripts are
//! TOML files of `[[step]]` tables:
//!
//! ```toml
//! [[step]]
//! code = "horizontal_axis"
//! value = 32767
//! delay_ms = 500
//!
//! [[step]]
//! code = "manual_blink"
//! value = 1
//! ```

use eye_common::config::ConfigLoader;
use eye_common::rig::driver::RigError;
use eye_common::rig::input::{InputCode, InputEvent, InputSource};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// One scripted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptStep {
    /// Input code.
    pub code: InputCode,
    /// Event value; defaults to a button press.
    #[serde(default = "press_value")]
    pub value: i32,
    /// Pause before the event is delivered.
    #[serde(default)]
    pub delay_ms: u64,
}

fn press_value() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    step: Vec<ScriptStep>,
}

/// Input source replaying scripted steps; exhausted after the last one.
pub struct ScriptedInput {
    name: String,
    steps: VecDeque<ScriptStep>,
}

impl ScriptedInput {
    /// Load a script file.
    ///
    /// # Errors
    /// `RigError::ConfigError` if the file is missing or malformed.
    pub fn from_file(path: &Path) -> Result<Self, RigError> {
        let script = ScriptFile::load(path)?;
        info!("Loaded {} scripted steps from {}", script.step.len(), path.display());
        Ok(Self {
            name: format!("script:{}", path.display()),
            steps: script.step.into(),
        })
    }

    /// Replay explicit steps.
    pub fn from_steps(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            name: "script".to_string(),
            steps: steps.into_iter().collect(),
        }
    }

    /// Replay events back to back with no delay.
    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self::from_steps(events.into_iter().map(|e| ScriptStep {
            code: e.code,
            value: e.value,
            delay_ms: 0,
        }))
    }

    /// Steps not yet delivered.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_event(&mut self) -> Result<Option<InputEvent>, RigError> {
        let Some(step) = self.steps.pop_front() else {
            return Ok(None);
        };
        if step.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(step.delay_ms));
        }
        Ok(Some(InputEvent::new(step.code, step.value)))
    }
}
