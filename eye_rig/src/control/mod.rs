//! Rig control: position math, state machines and the threads that drive them.
//!
//! - [`position`] - Eyelid modes and base lid angles
//! - [`gaze`] - Gaze target and the vertical lid offset
//! - [`trigger`] - Analog trigger override of one side's lids
//! - [`blink`] - Blink phase state machine
//! - [`output`] - Clamped actuator output
//! - [`controller`] - Shared state behind one lock
//! - [`request`] - Non-blocking blink requests and the blink worker
//! - [`scheduler`] - Randomized auto-blink
//! - [`dispatcher`] - Input event routing

pub mod blink;
pub mod controller;
pub mod dispatcher;
pub mod gaze;
pub mod output;
pub mod position;
pub mod request;
pub mod scheduler;
pub mod trigger;
