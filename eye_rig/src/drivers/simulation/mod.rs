//! Simulation driver module.
//!
//! Emulates a PWM servo board in software: records the angle and pulse width
//! each channel would be driven to, without touching hardware.

mod driver;

pub use driver::{ChannelOutput, SimulationDriver, SimulationProbe};

use eye_common::rig::driver::ActuatorDriver;

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn ActuatorDriver> {
    Box::new(SimulationDriver::new())
}
