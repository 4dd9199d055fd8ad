//! Shared rig state and the single exclusive-access boundary around it.
//!
//! `EyeController` owns the output, the position model, gaze, triggers,
//! eyelid mode, cached upper-lid positions and the blink machine behind one
//! `parking_lot::Mutex`. Every public operation takes the lock once for a
//! discrete update; the blink hold is a plain sleep with the lock released.

use crate::control::blink::{
    BlinkAnimator, BlinkEvent, BlinkPhase, BlinkRejected, TransitionResult,
};
use crate::control::gaze::{GazeState, GazeTracker};
use crate::control::output::RigOutput;
use crate::control::position::{EyelidMode, LidAngles, PositionModel};
use crate::control::trigger::{SideAngles, TriggerAction, TriggerOverride};
use eye_common::rig::channel::{Channel, Lid, Side};
use eye_common::rig::config::RigConfig;
use eye_common::rig::driver::{ActuatorDriver, DriverDiagnostics, RigError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Point-in-time copy of the shared records.
#[derive(Debug, Clone, PartialEq)]
pub struct RigSnapshot {
    /// Current eyelid mode.
    pub mode: EyelidMode,
    /// Current gaze target.
    pub gaze: GazeState,
    /// Trigger pressure (left, right).
    pub pressure: [u8; 2],
    /// Cached mode+gaze-consistent upper lid angle (left, right).
    pub upper_lid: [f64; 2],
    /// Blink phase.
    pub blink_phase: BlinkPhase,
    /// Completed blinks since startup.
    pub blinks_completed: u64,
    /// Rig parked for shutdown.
    pub parked: bool,
}

struct RigState {
    output: RigOutput,
    model: PositionModel,
    gaze: GazeTracker,
    triggers: TriggerOverride,
    mode: EyelidMode,
    upper_lid: [f64; 2],
    blink: BlinkAnimator,
    parked: bool,
}

const fn slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl RigState {
    /// Lid writes are suppressed during a blink and after parking.
    fn lids_writable(&self) -> bool {
        !self.blink.in_progress() && !self.parked
    }

    /// Recompute both cached upper-lid positions for `mode` and current gaze.
    fn refresh_upper_lid(&mut self, mode: EyelidMode) {
        let offset = self.gaze.vertical_offset();
        let base = self.model.base(mode);
        for side in Side::BOTH {
            self.upper_lid[slot(side)] =
                self.model.upper_with_offset(side, base[side.upper()], offset);
        }
    }

    fn drive_side(&mut self, side: Side, angles: SideAngles) {
        self.output.move_actuator(side.upper().channel(), angles.upper);
        self.output.move_actuator(side.lower().channel(), angles.lower);
    }

    /// Mode + gaze angles of one side from the cache and a base table.
    fn mode_angles(&self, side: Side, base: &LidAngles) -> SideAngles {
        SideAngles {
            upper: self.upper_lid[slot(side)],
            lower: base[side.lower()],
        }
    }

    /// Reapply mode and gaze offset to the sides not under trigger control.
    fn apply_mode(&mut self) {
        self.refresh_upper_lid(self.mode);
        if !self.lids_writable() {
            return;
        }
        let base = self.model.base(self.mode);
        for side in Side::BOTH {
            if self.triggers.is_engaged(side) {
                continue;
            }
            let angles = self.mode_angles(side, &base);
            self.drive_side(side, angles);
        }
    }

    /// Reapply the gaze offset to the upper lids not under trigger control.
    fn apply_gaze(&mut self) {
        self.refresh_upper_lid(self.mode);
        if !self.lids_writable() {
            return;
        }
        for side in Side::BOTH {
            if self.triggers.is_engaged(side) {
                continue;
            }
            let angle = self.upper_lid[slot(side)];
            self.output.move_actuator(side.upper().channel(), angle);
        }
    }

    fn drive_lids(&mut self, angles: &LidAngles) {
        for (lid, angle) in angles.iter() {
            self.output.move_actuator(lid.channel(), angle);
        }
    }
}

/// Cloneable handle to the shared rig state.
#[derive(Clone)]
pub struct EyeController {
    state: Arc<Mutex<RigState>>,
    hold: Duration,
}

impl EyeController {
    /// Build the controller around an initialized driver. Issues no commands.
    ///
    /// # Errors
    /// `RigError::ConfigError` if the channel calibration is invalid.
    pub fn new(config: &RigConfig, driver: Box<dyn ActuatorDriver>) -> Result<Self, RigError> {
        let table = config.range_table()?;
        let model = PositionModel::new(table.clone(), &config.eyelids.mid_closure);
        let gaze = GazeTracker::new(&table, config.eyelids.vertical_lid_modifier);
        let mut state = RigState {
            output: RigOutput::new(driver, table),
            model,
            gaze,
            triggers: TriggerOverride::new(config.eyelids.release_threshold),
            mode: EyelidMode::default(),
            upper_lid: [0.0; 2],
            blink: BlinkAnimator::new(Instant::now()),
            parked: false,
        };
        state.refresh_upper_lid(state.mode);

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            hold: config.blink.hold(),
        })
    }

    /// Center the gaze and drive the lids to the current mode.
    pub fn startup_pose(&self) {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        let gaze = s.gaze.center();
        s.output.move_actuator(Channel::EyeHorizontal, gaze.horizontal);
        s.output.move_actuator(Channel::EyeVertical, gaze.vertical);
        s.apply_mode();
        info!("Startup pose: gaze centered, lids {}", s.mode.as_str());
    }

    // ─── Gaze ───────────────────────────────────────────────────────

    /// Raw stick X value.
    pub fn set_horizontal_raw(&self, raw: i32) {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        let angle = s.gaze.set_horizontal_raw(raw);
        if !s.parked {
            s.output.move_actuator(Channel::EyeHorizontal, angle);
        }
    }

    /// Raw stick Y value.
    pub fn set_vertical_raw(&self, raw: i32) {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        let angle = s.gaze.set_vertical_raw(raw);
        Self::on_vertical(s, angle);
    }

    /// Vertical gaze angle (clamped into the channel range).
    pub fn set_vertical_angle(&self, angle: f64) {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        let angle = s.gaze.set_vertical(angle);
        Self::on_vertical(s, angle);
    }

    fn on_vertical(s: &mut RigState, angle: f64) {
        if !s.parked {
            s.output.move_actuator(Channel::EyeVertical, angle);
        }
        s.apply_gaze();
    }

    // ─── Triggers ───────────────────────────────────────────────────

    /// Raw trigger pressure for one side.
    pub fn set_trigger(&self, side: Side, raw: i32) {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        let was_engaged = s.triggers.is_engaged(side);
        let action = s.triggers.set_pressure(side, raw, s.model.table());
        let engaged = s.triggers.is_engaged(side);
        if engaged != was_engaged {
            debug!(
                "{} trigger {} (pressure {})",
                side.as_str(),
                if engaged { "engaged" } else { "released" },
                s.triggers.pressure(side)
            );
        }

        if !s.lids_writable() {
            return;
        }
        match action {
            TriggerAction::Override(angles) => s.drive_side(side, angles),
            TriggerAction::Release => {
                let base = s.model.base(s.mode);
                let angles = s.mode_angles(side, &base);
                s.drive_side(side, angles);
            }
        }
    }

    // ─── Mode ───────────────────────────────────────────────────────

    /// Switch to `mode` and reapply lids on the sides not under trigger control.
    pub fn set_mode(&self, mode: EyelidMode) {
        self.update_mode(|_| mode);
    }

    /// Compute the next mode from the current one under the lock.
    /// Returns the resulting mode.
    pub fn update_mode(&self, next: impl FnOnce(EyelidMode) -> EyelidMode) -> EyelidMode {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        let mode = next(s.mode);
        if mode != s.mode {
            info!("Eyelid mode {} -> {}", s.mode.as_str(), mode.as_str());
            s.mode = mode;
            if s.blink.retarget(mode) {
                debug!("Blink in flight will restore to {}", mode.as_str());
            }
        }
        s.apply_mode();
        s.mode
    }

    // ─── Blink ──────────────────────────────────────────────────────

    /// Closing step: check the guard, close all four lids, enter Holding.
    pub fn begin_blink(&self) -> Result<(), BlinkRejected> {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        if s.parked {
            return Err(BlinkRejected::ShuttingDown);
        }
        if s.blink.in_progress() {
            return Err(BlinkRejected::AlreadyBlinking);
        }
        if s.triggers.any_engaged() {
            return Err(BlinkRejected::TriggerEngaged);
        }

        let now = Instant::now();
        if let TransitionResult::Rejected(reason) =
            s.blink.handle_event(BlinkEvent::Start(s.mode), now)
        {
            debug!("Blink start rejected: {}", reason);
            return Err(BlinkRejected::AlreadyBlinking);
        }
        let closed = s.model.base(EyelidMode::Closed);
        s.drive_lids(&closed);
        s.blink.handle_event(BlinkEvent::Closed, now);
        debug!("Blink closing (restore to {})", s.blink.restore_mode().as_str());
        Ok(())
    }

    /// Reopening step: restore mode + current gaze, refresh caches, go Idle.
    ///
    /// A side whose trigger became engaged during the hold is handed straight
    /// to its trigger angles. Does nothing unless a blink is holding.
    pub fn finish_blink(&self) {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        let now = Instant::now();
        if let TransitionResult::Rejected(reason) =
            s.blink.handle_event(BlinkEvent::HoldElapsed, now)
        {
            debug!("Blink restore skipped: {}", reason);
            return;
        }

        let restore_mode = s.blink.restore_mode();
        s.refresh_upper_lid(restore_mode);
        if !s.parked {
            let base = s.model.base(restore_mode);
            for side in Side::BOTH {
                let angles = if s.triggers.is_engaged(side) {
                    s.triggers.lid_angles(side, s.model.table())
                } else {
                    s.mode_angles(side, &base)
                };
                s.drive_side(side, angles);
            }
        }
        s.blink.handle_event(BlinkEvent::Restored, now);
        debug!("Blink complete ({} total)", s.blink.completed());
    }

    /// Full blink: close, hold without the lock, restore.
    pub fn blink(&self) -> Result<(), BlinkRejected> {
        self.begin_blink()?;
        std::thread::sleep(self.hold);
        self.finish_blink();
        Ok(())
    }

    // ─── Shutdown ───────────────────────────────────────────────────

    /// Drive to centered gaze and closed lids; suppress every later write.
    pub fn park(&self) {
        let mut guard = self.state.lock();
        let s = &mut *guard;
        if s.parked {
            return;
        }
        s.parked = true;
        let gaze = s.gaze.center();
        s.output.move_actuator(Channel::EyeHorizontal, gaze.horizontal);
        s.output.move_actuator(Channel::EyeVertical, gaze.vertical);
        let closed = s.model.base(EyelidMode::Closed);
        s.drive_lids(&closed);
        info!("Rig parked: gaze centered, lids closed");
    }

    /// Release the actuator driver.
    pub fn release(&self) -> Result<(), RigError> {
        self.state.lock().output.shutdown()
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Hold duration of a blink.
    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// Current eyelid mode.
    pub fn mode(&self) -> EyelidMode {
        self.state.lock().mode
    }

    /// Whether a blink is in flight.
    pub fn is_blinking(&self) -> bool {
        self.state.lock().blink.in_progress()
    }

    /// When the last blink completed (startup counts as one).
    pub fn last_blink_completed(&self) -> Instant {
        self.state.lock().blink.last_completed()
    }

    /// Last angle commanded on a channel.
    pub fn commanded(&self, channel: Channel) -> Option<f64> {
        self.state.lock().output.last(channel)
    }

    /// Last commanded angle of every lid; `None` until all four were commanded.
    pub fn commanded_lids(&self) -> Option<LidAngles> {
        let state = self.state.lock();
        let mut angles = LidAngles::default();
        for lid in Lid::ALL {
            angles[lid] = state.output.last(lid.channel())?;
        }
        Some(angles)
    }

    /// Angles the current mode and gaze imply, ignoring triggers and blinks.
    pub fn mode_targets(&self) -> LidAngles {
        let state = self.state.lock();
        state.model.targets(state.mode, state.gaze.vertical_offset())
    }

    /// Driver diagnostics.
    pub fn diagnostics(&self) -> Option<DriverDiagnostics> {
        self.state.lock().output.diagnostics()
    }

    /// Copy of the shared records.
    pub fn snapshot(&self) -> RigSnapshot {
        let state = self.state.lock();
        RigSnapshot {
            mode: state.mode,
            gaze: state.gaze.state(),
            pressure: [
                state.triggers.pressure(Side::Left),
                state.triggers.pressure(Side::Right),
            ],
            upper_lid: state.upper_lid,
            blink_phase: state.blink.phase(),
            blinks_completed: state.blink.completed(),
            parked: state.parked,
        }
    }
}
