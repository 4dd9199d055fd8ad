//! Clamped actuator output.
//!
//! Every angle leaving the controller goes through `RigOutput`, which clamps
//! it into the channel's calibrated range before handing it to the driver.

use eye_common::consts::CHANNEL_COUNT;
use eye_common::rig::channel::{Channel, RangeTable};
use eye_common::rig::driver::{ActuatorDriver, DriverDiagnostics, RigError};
use tracing::{trace, warn};

/// Driver plus calibration, with the last commanded angle per channel.
pub struct RigOutput {
    driver: Box<dyn ActuatorDriver>,
    table: RangeTable,
    last: [Option<f64>; CHANNEL_COUNT],
}

impl RigOutput {
    /// Wrap an initialized driver.
    pub fn new(driver: Box<dyn ActuatorDriver>, table: RangeTable) -> Self {
        Self {
            driver,
            table,
            last: [None; CHANNEL_COUNT],
        }
    }

    /// Clamp `angle` into the channel's range and command it.
    ///
    /// Returns whether the driver recognized the channel.
    pub fn move_actuator(&mut self, channel: Channel, angle: f64) -> bool {
        let clamped = self.table.clamp(channel, angle);
        trace!(channel = channel.as_str(), angle, clamped, "move");
        let accepted = self.driver.set_angle(channel, clamped);
        if accepted {
            self.last[channel.index()] = Some(clamped);
        } else {
            warn!("Driver {} rejected channel {}", self.driver.name(), channel.as_str());
        }
        accepted
    }

    /// Command a channel by raw output index. `false` for an unknown channel.
    pub fn move_index(&mut self, index: u8, angle: f64) -> bool {
        match Channel::from_u8(index) {
            Some(channel) => self.move_actuator(channel, angle),
            None => false,
        }
    }

    /// Last angle commanded on a channel, if any.
    pub fn last(&self, channel: Channel) -> Option<f64> {
        self.last[channel.index()]
    }

    /// Driver diagnostics, if the driver provides them.
    pub fn diagnostics(&self) -> Option<DriverDiagnostics> {
        self.driver.diagnostics()
    }

    /// Release the driver.
    pub fn shutdown(&mut self) -> Result<(), RigError> {
        self.driver.shutdown()
    }
}
