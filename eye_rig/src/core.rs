//! EyeCore: driver loading, thread orchestration and shutdown.
//!
//! The `EyeCore` struct is the main entry point. It owns the configuration,
//! builds the controller around a driver, spawns the blink worker, the
//! auto-blink scheduler and the input dispatcher, and parks the rig on
//! shutdown.

use crate::control::controller::EyeController;
use crate::control::dispatcher::InputDispatcher;
use crate::control::request::blink_channel;
use crate::control::scheduler::AutoBlinkScheduler;
use eye_common::config::ConfigLoader;
use eye_common::rig::config::RigConfig;
use eye_common::rig::driver::{ActuatorDriver, RigError};
use eye_common::rig::input::InputSource;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Rig core managing the driver and worker threads.
pub struct EyeCore {
    /// Rig configuration
    config: RigConfig,
    /// Controller, present after `init`
    controller: Option<EyeController>,
    /// Running flag shared with every thread and the signal handler
    running: Arc<AtomicBool>,
    /// Blink worker and scheduler
    workers: Vec<(&'static str, JoinHandle<()>)>,
    /// Input dispatcher; may stay blocked in a device read
    input: Option<JoinHandle<()>>,
}

impl EyeCore {
    /// Create a new EyeCore with the given configuration.
    ///
    /// # Errors
    /// Returns error if configuration validation fails.
    pub fn new(config: RigConfig) -> Result<Self, RigError> {
        config.validate()?;
        info!(
            "EyeCore created: hold={}ms, auto-blink {}-{}s",
            config.blink.hold_ms, config.blink.interval_min_s, config.blink.interval_max_s
        );
        Ok(Self {
            config,
            controller: None,
            running: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
            input: None,
        })
    }

    /// Load rig configuration from a TOML file.
    ///
    /// # Errors
    /// `RigError::ConfigError` if the file is missing, malformed or invalid.
    pub fn load_config(config_path: &Path) -> Result<RigConfig, RigError> {
        info!("Loading configuration from {:?}", config_path);
        let config = RigConfig::load(config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration in use.
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Create the named built-in driver and initialize the rig.
    ///
    /// # Errors
    /// Returns error if the driver is unknown or fails to initialize.
    pub fn init(&mut self, driver_name: &str) -> Result<(), RigError> {
        info!("Initializing EyeCore with driver '{}'...", driver_name);
        let driver = crate::drivers::create(driver_name)?;
        self.init_with_driver(driver)
    }

    /// Initialize the rig around an already constructed driver.
    ///
    /// Initializes the driver, builds the controller and drives the startup
    /// pose.
    ///
    /// # Errors
    /// Returns error if the driver fails to initialize.
    pub fn init_with_driver(
        &mut self,
        mut driver: Box<dyn ActuatorDriver>,
    ) -> Result<(), RigError> {
        if self.controller.is_some() {
            return Err(RigError::InitFailed("EyeCore already initialized".to_string()));
        }
        info!("Created driver: {} v{}", driver.name(), driver.version());
        driver.init(&self.config)?;

        let controller = EyeController::new(&self.config, driver)?;
        controller.startup_pose();
        self.controller = Some(controller);
        info!("EyeCore initialized successfully");
        Ok(())
    }

    /// Controller handle, once initialized.
    pub fn controller(&self) -> Option<&EyeController> {
        self.controller.as_ref()
    }

    /// Start the worker threads and block until the running flag clears.
    ///
    /// Without an input source the rig only auto-blinks.
    ///
    /// # Errors
    /// Returns error if not initialized or a thread cannot be spawned.
    pub fn run(&mut self, input: Option<Box<dyn InputSource>>) -> Result<(), RigError> {
        let controller = self
            .controller
            .clone()
            .ok_or_else(|| RigError::InitFailed("Driver not initialized".to_string()))?;

        self.running.store(true, Ordering::SeqCst);
        let poll = self.config.blink.poll();
        let (requester, worker) = blink_channel(controller.clone());

        let running = Arc::clone(&self.running);
        self.spawn_worker("blink", move || worker.run(running, poll))?;

        let scheduler = AutoBlinkScheduler::new(&self.config.blink, StdRng::from_entropy());
        let (c, r, running) = (controller.clone(), requester.clone(), Arc::clone(&self.running));
        self.spawn_worker("autoblink", move || scheduler.run(c, r, running, poll))?;

        match input {
            Some(mut source) => {
                let dispatcher = InputDispatcher::new(
                    controller,
                    requester,
                    Arc::clone(&self.running),
                    self.config.input.error_backoff(),
                );
                let handle = thread::Builder::new()
                    .name("input".to_string())
                    .spawn(move || dispatcher.run(source.as_mut()))
                    .map_err(|e| {
                        RigError::InitFailed(format!("failed to spawn input thread: {e}"))
                    })?;
                self.input = Some(handle);
            }
            None => info!("No input source; running auto-blink only"),
        }

        info!("Eye rig running");
        while self.running.load(Ordering::SeqCst) {
            thread::sleep(poll);
        }
        Ok(())
    }

    fn spawn_worker<F>(&mut self, name: &'static str, f: F) -> Result<(), RigError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(f)
            .map_err(|e| RigError::InitFailed(format!("failed to spawn {name} thread: {e}")))?;
        self.workers.push((name, handle));
        Ok(())
    }

    /// Park the rig, stop the threads and release the driver.
    ///
    /// Safe to call more than once; the driver is released on the first
    /// call and `controller()` is `None` afterwards.
    ///
    /// # Errors
    /// Returns error if the driver fails to shut down.
    pub fn shutdown(&mut self) -> Result<(), RigError> {
        info!("Shutting down EyeCore...");
        self.running.store(false, Ordering::SeqCst);

        let Some(controller) = self.controller.take() else {
            return Ok(());
        };
        controller.park();

        for (name, handle) in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("{} thread panicked", name);
            }
        }
        if let Some(handle) = self.input.take() {
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("input thread panicked");
                }
            } else {
                debug!("Input thread still blocked in a read; detaching");
            }
        }

        if let Some(diag) = controller.diagnostics() {
            info!(
                "Driver stats: {} commands, {} rejected",
                diag.commands, diag.rejected
            );
        }
        controller.release()?;
        info!("EyeCore shutdown complete");
        Ok(())
    }

    /// Get the running flag for signal handling.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}
