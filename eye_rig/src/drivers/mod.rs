//! Actuator driver implementations.
//!
//! - [`simulation`] - Software servo output for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `ActuatorDriver` trait from `eye_common::rig::driver`
//! 3. Add its `--driver` name to [`create`] and [`NAMES`]

pub mod simulation;

use eye_common::rig::driver::{ActuatorDriver, RigError};

/// Names accepted by [`create`].
pub const NAMES: &[&str] = &["simulation"];

/// Create a built-in driver by its `--driver` name.
///
/// # Errors
/// `RigError::DriverNotFound` listing the known names.
pub fn create(name: &str) -> Result<Box<dyn ActuatorDriver>, RigError> {
    match name {
        "simulation" => Ok(simulation::create_driver()),
        other => Err(RigError::DriverNotFound(format!(
            "'{}' (available: {})",
            other,
            NAMES.join(", ")
        ))),
    }
}
