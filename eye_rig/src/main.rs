//! # Eye Rig Binary
//!
//! Drives a six-actuator animatronic eye from a game controller or a
//! scripted event file, with randomized auto-blink.
//!
//! # Usage
//!
//! ```bash
//! # Simulation driver, defaults, auto-blink only
//! eye_rig
//!
//! # Calibrated rig with a replay script
//! eye_rig --config config/rig.toml --script demos/look_around.toml
//!
//! # Game controller (built with --features gamepad)
//! eye_rig --config config/rig.toml --device /dev/input/event5 -v
//! ```

#![deny(warnings)]

use clap::Parser;
use eye_common::config::LogLevel;
use eye_common::consts::DEFAULT_CONFIG_PATH;
use eye_common::rig::config::RigConfig;
use eye_common::rig::input::InputSource;
use eye_rig::core::EyeCore;
use eye_rig::input::ScriptedInput;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Eye Rig - animatronic eye controller
#[derive(Parser, Debug)]
#[command(name = "eye_rig")]
#[command(version)]
#[command(about = "Animatronic eye controller with gaze-coupled eyelids and auto-blink")]
#[command(long_about = None)]
struct Args {
    /// Path to rig configuration file (rig.toml). Falls back to /etc/eye_rig/rig.toml,
    /// then to the built-in calibration.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Actuator driver to load
    #[arg(short, long, default_value = "simulation")]
    driver: String,

    /// Replay input events from a TOML script
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// evdev game controller device (discovered automatically if omitted)
    #[cfg(feature = "gamepad")]
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("Eye rig startup failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config is read before tracing so its log level can be the default.
    let config_path = args.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        default.exists().then_some(default)
    });
    let config = config_path.as_deref().map(EyeCore::load_config).transpose();
    let config_level = match &config {
        Ok(Some(c)) => c.shared.log_level,
        _ => LogLevel::default(),
    };
    setup_tracing(&args, config_level);

    info!("Eye Rig v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = config?.unwrap_or_else(|| {
        info!("No configuration file; using built-in calibration");
        RigConfig::default()
    });

    let input = open_input(&args)?;

    let mut core = EyeCore::new(config)?;

    let running = core.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    core.init(&args.driver)?;

    if let Err(e) = core.run(input) {
        error!("Run loop error: {}", e);
    }

    core.shutdown()?;
    info!("Eye Rig shutdown complete");
    Ok(())
}

/// Pick the input source from CLI arguments.
fn open_input(args: &Args) -> Result<Option<Box<dyn InputSource>>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.script {
        return Ok(Some(Box::new(ScriptedInput::from_file(path)?)));
    }

    open_gamepad(args)
}

#[cfg(feature = "gamepad")]
fn open_gamepad(args: &Args) -> Result<Option<Box<dyn InputSource>>, Box<dyn std::error::Error>> {
    use eye_rig::input::gamepad::GamepadInput;
    let gamepad = match &args.device {
        Some(path) => Some(GamepadInput::open(path)?),
        None => match GamepadInput::discover() {
            Ok(gamepad) => Some(gamepad),
            Err(e) => {
                warn!("{}; continuing without input", e);
                None
            }
        },
    };
    Ok(gamepad.map(|g| Box::new(g) as Box<dyn InputSource>))
}

#[cfg(not(feature = "gamepad"))]
fn open_gamepad(_args: &Args) -> Result<Option<Box<dyn InputSource>>, Box<dyn std::error::Error>> {
    warn!("No --script given and gamepad support not built; auto-blink only");
    Ok(None)
}

/// Setup tracing subscriber based on CLI arguments and configured level.
fn setup_tracing(args: &Args, config_level: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(config_level)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
