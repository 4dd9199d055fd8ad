//! # Eye Rig Library
//!
//! Controller for a six-actuator animatronic eye: two lids per eye plus a
//! shared horizontal and vertical gaze mechanism.
//!
//! # Module Structure
//!
//! - [`control`] - Position model, gaze, triggers, blink and shared state
//! - [`core`] - EyeCore struct, thread orchestration and shutdown
//! - [`drivers`] - Actuator driver implementations, created by name
//! - [`input`] - Input sources
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  events  ┌────────────────┐        ┌──────────────────┐
//! │ InputSource  │─────────►│ InputDispatcher│───────►│                  │
//! └──────────────┘          └───────┬────────┘        │  EyeController   │
//!                                   │ request         │  (one lock)      │
//! ┌──────────────┐  request ┌───────▼────────┐ blink  │                  │
//! │ AutoBlink    │─────────►│ Blink worker   │───────►│                  │
//! │ Scheduler    │          └────────────────┘        └────────┬─────────┘
//! └──────────────┘                                             │ clamped
//!                                                     ┌────────▼─────────┐
//!                                                     │ ActuatorDriver   │
//!                                                     └──────────────────┘
//! ```

#![deny(missing_docs)]

pub mod control;
pub mod core;
pub mod drivers;
pub mod input;

pub use crate::control::controller::{EyeController, RigSnapshot};
pub use crate::core::EyeCore;
