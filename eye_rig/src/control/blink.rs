//! Blink animation state machine.
//!
//! Idle → Closing → Holding → Reopening → Idle.
//!
//! The machine only tracks phase, the mode to restore and timestamps; the
//! controller performs the actual lid writes around each transition.

use crate::control::position::EyelidMode;
use std::time::Instant;

/// Blink animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkPhase {
    /// No blink in flight.
    #[default]
    Idle,
    /// Lids are being driven closed.
    Closing,
    /// Lids closed, waiting out the hold duration.
    Holding,
    /// Lids are being restored.
    Reopening,
}

/// Why a blink request was turned down. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkRejected {
    /// Another blink is in flight.
    AlreadyBlinking,
    /// A trigger holds manual control of a lid.
    TriggerEngaged,
    /// The rig has been parked for shutdown.
    ShuttingDown,
}

impl BlinkRejected {
    /// Short reason for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyBlinking => "blink already in progress",
            Self::TriggerEngaged => "trigger engaged",
            Self::ShuttingDown => "shutting down",
        }
    }
}

/// Event driving the blink machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkEvent {
    /// Accepted blink request, carrying the mode to restore.
    Start(EyelidMode),
    /// Closing write issued.
    Closed,
    /// Hold duration elapsed.
    HoldElapsed,
    /// Restore write issued.
    Restored,
}

/// Result of a transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition succeeded: new phase.
    Ok(BlinkPhase),
    /// Transition rejected: reason.
    Rejected(&'static str),
}

/// Blink state machine.
#[derive(Debug, Clone)]
pub struct BlinkAnimator {
    phase: BlinkPhase,
    restore_mode: EyelidMode,
    last_completed: Instant,
    completed: u64,
}

impl BlinkAnimator {
    /// Idle machine; `now` counts as the last completed blink.
    pub fn new(now: Instant) -> Self {
        Self {
            phase: BlinkPhase::Idle,
            restore_mode: EyelidMode::default(),
            last_completed: now,
            completed: 0,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// The "blink in progress" guard seen by other components.
    #[inline]
    pub fn in_progress(&self) -> bool {
        self.phase != BlinkPhase::Idle
    }

    /// Mode the restore step will apply.
    pub fn restore_mode(&self) -> EyelidMode {
        self.restore_mode
    }

    /// Change the pending restore mode of an in-flight blink.
    ///
    /// Returns `false` (and does nothing) when no blink is in flight.
    pub fn retarget(&mut self, mode: EyelidMode) -> bool {
        if !self.in_progress() {
            return false;
        }
        self.restore_mode = mode;
        true
    }

    /// When the last blink finished.
    pub fn last_completed(&self) -> Instant {
        self.last_completed
    }

    /// Number of completed blinks.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Attempt a transition.
    ///
    /// `now` is recorded as the completion time on `Restored`.
    pub fn handle_event(&mut self, event: BlinkEvent, now: Instant) -> TransitionResult {
        use BlinkEvent::*;
        use BlinkPhase::*;

        let next = match (self.phase, event) {
            (Idle, Start(mode)) => {
                self.restore_mode = mode;
                Closing
            }
            (Closing, Closed) => Holding,
            (Holding, HoldElapsed) => Reopening,
            (Reopening, Restored) => {
                self.last_completed = now;
                self.completed += 1;
                Idle
            }
            (Idle, _) => return TransitionResult::Rejected("no blink in progress"),
            (_, Start(_)) => return TransitionResult::Rejected("blink already in progress"),
            _ => return TransitionResult::Rejected("out-of-order blink event"),
        };

        self.phase = next;
        TransitionResult::Ok(next)
    }
}
