//! Non-blocking blink requests and the blink worker thread.
//!
//! Both the input dispatcher and the auto-blink scheduler ask for blinks
//! through a `BlinkRequester`. A request made while another one is pending
//! or animating is dropped, never queued.

use crate::control::controller::EyeController;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Who asked for a blink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkSource {
    /// Auto-blink scheduler.
    Auto,
    /// Manual blink button.
    Manual,
}

impl BlinkSource {
    /// Lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

/// Cheap cloneable handle for requesting blinks.
#[derive(Clone)]
pub struct BlinkRequester {
    busy: Arc<AtomicBool>,
    tx: SyncSender<BlinkSource>,
}

impl BlinkRequester {
    /// Request a blink without waiting for it.
    ///
    /// Returns `false` if the request was dropped because a blink is already
    /// pending or animating, or the worker is gone.
    pub fn request(&self, source: BlinkSource) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("{} blink request dropped: blink pending", source.as_str());
            return false;
        }
        if self.tx.try_send(source).is_err() {
            self.busy.store(false, Ordering::Release);
            debug!("{} blink request dropped: worker unavailable", source.as_str());
            return false;
        }
        true
    }

    /// Whether a request is pending or animating.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Runs accepted blink requests one at a time.
pub struct BlinkWorker {
    controller: EyeController,
    busy: Arc<AtomicBool>,
    rx: Receiver<BlinkSource>,
}

/// Create a connected requester/worker pair.
pub fn blink_channel(controller: EyeController) -> (BlinkRequester, BlinkWorker) {
    let (tx, rx) = mpsc::sync_channel(1);
    let busy = Arc::new(AtomicBool::new(false));
    (
        BlinkRequester {
            busy: Arc::clone(&busy),
            tx,
        },
        BlinkWorker {
            controller,
            busy,
            rx,
        },
    )
}

impl BlinkWorker {
    /// Serve requests until `running` clears or every requester is dropped.
    ///
    /// `poll` bounds how long shutdown may go unnoticed while idle.
    pub fn run(self, running: Arc<AtomicBool>, poll: Duration) {
        debug!("Blink worker started");
        while running.load(Ordering::SeqCst) {
            match self.rx.recv_timeout(poll) {
                Ok(source) => self.serve(source),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("Blink worker stopped");
    }

    /// Animate one request and clear the busy flag.
    pub fn serve(&self, source: BlinkSource) {
        match self.controller.blink() {
            Ok(()) => info!("Blink ({})", source.as_str()),
            Err(reason) => debug!("{} blink rejected: {}", source.as_str(), reason.as_str()),
        }
        self.busy.store(false, Ordering::Release);
    }
}
