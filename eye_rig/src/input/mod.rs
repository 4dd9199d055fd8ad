//! Input sources.
//!
//! - [`script`] - Timed events from a TOML script or an in-memory list
//! - [`gamepad`] - Linux evdev game controller (feature `gamepad`)

#[cfg(feature = "gamepad")]
pub mod gamepad;
pub mod script;

pub use script::ScriptedInput;
