//! Eye rig types: channels, calibration, configuration and the
//! interfaces to actuator drivers and input sources.

pub mod channel;
pub mod config;
pub mod driver;
pub mod input;
