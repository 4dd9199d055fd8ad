//! Input dispatcher.
//!
//! Drains an `InputSource` and routes each event to the controller. Buttons
//! act on their press edge only; releases are ignored.

use crate::control::controller::EyeController;
use crate::control::request::{BlinkRequester, BlinkSource};
use eye_common::rig::channel::Side;
use eye_common::rig::input::{InputCode, InputEvent, InputSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// What the dispatch loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep reading.
    Continue,
    /// Exit requested; stop reading.
    Exit,
}

/// Routes input events into the controller.
pub struct InputDispatcher {
    controller: EyeController,
    requester: BlinkRequester,
    running: Arc<AtomicBool>,
    backoff: Duration,
}

impl InputDispatcher {
    /// Create a dispatcher. `backoff` is the pause after a read error.
    pub fn new(
        controller: EyeController,
        requester: BlinkRequester,
        running: Arc<AtomicBool>,
        backoff: Duration,
    ) -> Self {
        Self {
            controller,
            requester,
            running,
            backoff,
        }
    }

    /// Route one event.
    pub fn dispatch(&self, event: InputEvent) -> Dispatch {
        trace!(code = ?event.code, value = event.value, "input");
        match event.code {
            InputCode::HorizontalAxis => self.controller.set_horizontal_raw(event.value),
            InputCode::VerticalAxis => self.controller.set_vertical_raw(event.value),
            InputCode::LeftTrigger => self.controller.set_trigger(Side::Left, event.value),
            InputCode::RightTrigger => self.controller.set_trigger(Side::Right, event.value),
            code if !event.is_press() => {
                trace!(?code, "button release ignored");
            }
            InputCode::ModeToggle => {
                self.controller.update_mode(|m| m.toggled_open());
            }
            InputCode::SquintToggle => {
                self.controller.update_mode(|m| m.toggled_squint());
            }
            InputCode::SleepToggle => {
                self.controller.update_mode(|m| m.toggled_sleep());
            }
            InputCode::ManualBlink => {
                self.requester.request(BlinkSource::Manual);
            }
            InputCode::Exit => {
                info!("Exit requested from input");
                self.running.store(false, Ordering::SeqCst);
                return Dispatch::Exit;
            }
        }
        Dispatch::Continue
    }

    /// Read and dispatch until exit, source exhaustion, or shutdown.
    ///
    /// Read errors are logged and retried after the backoff. Exhaustion
    /// stops reading but leaves the rest of the rig running.
    pub fn run(&self, source: &mut dyn InputSource) {
        info!("Input dispatcher reading from {}", source.name());
        while self.running.load(Ordering::SeqCst) {
            match source.next_event() {
                Ok(Some(event)) => {
                    if self.dispatch(event) == Dispatch::Exit {
                        break;
                    }
                }
                Ok(None) => {
                    info!("Input source {} exhausted", source.name());
                    break;
                }
                Err(e) => {
                    warn!("Input read failed on {}: {}", source.name(), e);
                    std::thread::sleep(self.backoff);
                }
            }
        }
        debug!("Input dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::position::EyelidMode;
    use crate::control::request::blink_channel;
    use crate::drivers::simulation::SimulationDriver;
    use eye_common::rig::channel::Channel;
    use eye_common::rig::config::RigConfig;
    use eye_common::rig::driver::{ActuatorDriver, RigError};
    use std::collections::VecDeque;

    struct Queue {
        events: VecDeque<Result<Option<InputEvent>, RigError>>,
    }

    impl InputSource for Queue {
        fn name(&self) -> &str {
            "queue"
        }

        fn next_event(&mut self) -> Result<Option<InputEvent>, RigError> {
            self.events.pop_front().unwrap_or(Ok(None))
        }
    }

    fn dispatcher() -> (InputDispatcher, EyeController, Arc<AtomicBool>) {
        let config = RigConfig::default();
        let mut driver = SimulationDriver::new();
        driver.init(&config).unwrap();
        let controller = EyeController::new(&config, Box::new(driver)).unwrap();
        controller.startup_pose();
        let (requester, _worker) = blink_channel(controller.clone());
        let running = Arc::new(AtomicBool::new(true));
        let d = InputDispatcher::new(
            controller.clone(),
            requester,
            Arc::clone(&running),
            Duration::from_millis(1),
        );
        (d, controller, running)
    }

    #[test]
    fn toggles_act_on_press_only() {
        let (d, c, _) = dispatcher();
        d.dispatch(InputEvent::new(InputCode::ModeToggle, 0));
        assert_eq!(c.mode(), EyelidMode::Mid);
        d.dispatch(InputEvent::press(InputCode::ModeToggle));
        assert_eq!(c.mode(), EyelidMode::Open);
        d.dispatch(InputEvent::press(InputCode::SquintToggle));
        assert_eq!(c.mode(), EyelidMode::Squint);
        d.dispatch(InputEvent::press(InputCode::SleepToggle));
        assert_eq!(c.mode(), EyelidMode::Closed);
        d.dispatch(InputEvent::press(InputCode::SleepToggle));
        assert_eq!(c.mode(), EyelidMode::Mid);
    }

    #[test]
    fn axes_move_the_gaze() {
        let (d, c, _) = dispatcher();
        d.dispatch(InputEvent::new(InputCode::HorizontalAxis, 32767));
        assert_eq!(c.commanded(Channel::EyeHorizontal), Some(130.0));
        d.dispatch(InputEvent::new(InputCode::VerticalAxis, -32768));
        assert_eq!(c.commanded(Channel::EyeVertical), Some(90.0));
    }

    #[test]
    fn triggers_close_only_their_own_side() {
        let (d, c, _) = dispatcher();
        d.dispatch(InputEvent::new(InputCode::LeftTrigger, 255));
        assert_eq!(c.commanded(Channel::LeftUpperLid), Some(0.0));
        assert_eq!(c.commanded(Channel::LeftLowerLid), Some(155.0));
        assert_eq!(c.commanded(Channel::RightUpperLid), Some(40.0));
        assert_eq!(c.commanded(Channel::RightLowerLid), Some(154.0));

        d.dispatch(InputEvent::new(InputCode::RightTrigger, 255));
        assert_eq!(c.commanded(Channel::RightUpperLid), Some(80.0));
        assert_eq!(c.commanded(Channel::RightLowerLid), Some(145.0));
        assert_eq!(c.commanded(Channel::LeftUpperLid), Some(0.0));

        d.dispatch(InputEvent::new(InputCode::LeftTrigger, 0));
        assert_eq!(c.commanded(Channel::LeftUpperLid), Some(40.0));
        assert_eq!(c.commanded(Channel::LeftLowerLid), Some(146.0));
        assert_eq!(c.commanded(Channel::RightUpperLid), Some(80.0));
    }

    #[test]
    fn exit_clears_running_and_stops_loop() {
        let (d, c, running) = dispatcher();
        let mut source = Queue {
            events: VecDeque::from(vec![
                Err(RigError::InputError("glitch".into())),
                Ok(Some(InputEvent::press(InputCode::ModeToggle))),
                Ok(Some(InputEvent::press(InputCode::Exit))),
                Ok(Some(InputEvent::press(InputCode::SquintToggle))),
            ]),
        };
        d.run(&mut source);
        assert!(!running.load(Ordering::SeqCst));
        assert_eq!(c.mode(), EyelidMode::Open);
        assert_eq!(source.events.len(), 1);
    }

    #[test]
    fn exhaustion_leaves_rig_running() {
        let (d, _, running) = dispatcher();
        let mut source = Queue {
            events: VecDeque::new(),
        };
        d.run(&mut source);
        assert!(running.load(Ordering::SeqCst));
    }
}
