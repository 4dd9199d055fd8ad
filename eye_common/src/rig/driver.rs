//! Actuator driver trait and error types.
//!
//! This module defines:
//! - `ActuatorDriver` trait - Interface for pluggable actuator backends
//! - `RigError` enum - Error types for rig operations
//! - `DriverDiagnostics` struct - Optional driver diagnostics

use crate::config::ConfigError;
use crate::rig::channel::Channel;
use crate::rig::config::RigConfig;
use thiserror::Error;

/// Error types for rig operations.
#[derive(Debug, Clone, Error)]
pub enum RigError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Input device read or decode error
    #[error("Input error: {0}")]
    InputError(String),

    /// Actuator backend refused an operation
    #[error("Actuator error: {0}")]
    ActuatorError(String),
}

impl From<ConfigError> for RigError {
    fn from(e: ConfigError) -> Self {
        RigError::ConfigError(e.to_string())
    }
}

/// Optional driver diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DriverDiagnostics {
    /// Number of accepted angle commands
    pub commands: u64,
    /// Number of rejected angle commands (unknown channel)
    pub rejected: u64,
    /// Driver-specific diagnostics
    pub custom: Option<String>,
}

/// Trait defining the interface for actuator drivers.
///
/// The controller issues one `set_angle` per channel update. Angles are
/// already clamped to the channel's calibrated range; drivers never see
/// out-of-range values.
///
/// # Lifecycle
///
/// 1. `init()` - Called once before any command
/// 2. `set_angle()` - Called for every channel update
/// 3. `shutdown()` - Called after the rig has been parked
pub trait ActuatorDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the driver with the rig configuration.
    ///
    /// # Errors
    /// Return `RigError::InitFailed` if the output cannot be opened.
    fn init(&mut self, config: &RigConfig) -> Result<(), RigError>;

    /// Command one channel to a pre-clamped angle.
    ///
    /// Returns `false` if the driver does not recognize the channel.
    /// Delivery failures are not reported.
    fn set_angle(&mut self, channel: Channel, angle: f64) -> bool;

    /// Release the output.
    fn shutdown(&mut self) -> Result<(), RigError>;

    /// Get driver-specific diagnostics.
    /// Default: None
    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        None
    }
}
