//! Prelude module for common re-exports.
//!
//! ```rust
//! use eye_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::rig::config::RigConfig;

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{CHANNEL_COUNT, LID_COUNT};

// ─── Rig ────────────────────────────────────────────────────────────
pub use crate::rig::channel::{Channel, Lid, LidRange, RangeSpec, RangeTable, Side, map_value};
pub use crate::rig::driver::{ActuatorDriver, RigError};
pub use crate::rig::input::{InputCode, InputEvent, InputSource};
