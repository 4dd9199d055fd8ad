//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `ActuatorDriver` trait. Each angle
//! is converted to the pulse width a hobby servo board would emit, and the
//! result is kept per channel for inspection through a `SimulationProbe`.

use eye_common::consts::CHANNEL_COUNT;
use eye_common::rig::channel::Channel;
use eye_common::rig::config::{RigConfig, ServoConfig};
use eye_common::rig::driver::{ActuatorDriver, DriverDiagnostics, RigError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Per-channel output state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelOutput {
    /// Last commanded angle in degrees.
    pub angle: f64,
    /// Pulse width for that angle in microseconds.
    pub pulse_us: f64,
}

#[derive(Debug, Default)]
struct SimState {
    initialized: bool,
    servo: ServoConfig,
    outputs: [Option<ChannelOutput>; CHANNEL_COUNT],
    commands: u64,
    rejected: u64,
}

impl SimState {
    fn pulse_for(&self, angle: f64) -> f64 {
        let min = f64::from(self.servo.min_pulse_us);
        let max = f64::from(self.servo.max_pulse_us);
        min + angle / self.servo.actuation_range_deg * (max - min)
    }
}

/// Read-only view into a simulation driver, usable after the driver has been
/// boxed and handed to the controller.
#[derive(Debug, Clone)]
pub struct SimulationProbe {
    state: Arc<Mutex<SimState>>,
}

impl SimulationProbe {
    /// Last output on a channel, if it was ever commanded.
    pub fn output(&self, channel: Channel) -> Option<ChannelOutput> {
        self.state.lock().outputs[channel.index()]
    }

    /// Last angle on a channel.
    pub fn angle(&self, channel: Channel) -> Option<f64> {
        self.output(channel).map(|o| o.angle)
    }

    /// Number of accepted commands.
    pub fn commands(&self) -> u64 {
        self.state.lock().commands
    }

    /// Whether the driver is between `init` and `shutdown`.
    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }
}

/// Simulation driver implementing the ActuatorDriver trait.
pub struct SimulationDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    /// Shared with probes
    state: Arc<Mutex<SimState>>,
}

impl SimulationDriver {
    /// Create a new simulation driver instance.
    pub fn new() -> Self {
        Self {
            name: "simulation",
            version: env!("CARGO_PKG_VERSION"),
            state: Arc::new(Mutex::new(SimState::default())),
        }
    }

    /// Probe sharing this driver's state.
    pub fn probe(&self) -> SimulationProbe {
        SimulationProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, config: &RigConfig) -> Result<(), RigError> {
        let mut state = self.state.lock();
        if state.initialized {
            return Err(RigError::InitFailed("simulation driver already initialized".to_string()));
        }
        state.servo = config.servo.clone();
        state.outputs = [None; CHANNEL_COUNT];
        state.initialized = true;
        info!(
            "Simulation driver initialized: {} channels, {}-{}us pulses at {}Hz",
            CHANNEL_COUNT,
            config.servo.min_pulse_us,
            config.servo.max_pulse_us,
            config.servo.frequency_hz
        );
        Ok(())
    }

    fn set_angle(&mut self, channel: Channel, angle: f64) -> bool {
        let mut state = self.state.lock();
        if !state.initialized {
            state.rejected += 1;
            return false;
        }
        let pulse_us = state.pulse_for(angle);
        state.outputs[channel.index()] = Some(ChannelOutput { angle, pulse_us });
        state.commands += 1;
        trace!(channel = channel.as_str(), angle, pulse_us, "sim output");
        true
    }

    fn shutdown(&mut self) -> Result<(), RigError> {
        let mut state = self.state.lock();
        if !state.initialized {
            return Err(RigError::ActuatorError(
                "simulation driver shut down without init".to_string(),
            ));
        }
        state.initialized = false;
        debug!("Simulation driver shut down after {} commands", state.commands);
        Ok(())
    }

    fn diagnostics(&self) -> Option<DriverDiagnostics> {
        let state = self.state.lock();
        Some(DriverDiagnostics {
            commands: state.commands,
            rejected: state.rejected,
            custom: Some(format!("initialized={}", state.initialized)),
        })
    }
}
