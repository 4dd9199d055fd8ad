//! Eye Rig Common Library
//!
//! This crate provides shared constants, calibration tables, configuration
//! loading and the actuator/input interfaces for all eye rig workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Fixed topology limits and input value ranges
//! - [`config`] - Configuration loading traits and types
//! - [`rig`] - Channels, range table, rig configuration, driver and input traits
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use eye_common::rig::channel::{Channel, map_value};
//! use eye_common::config::ConfigLoader;
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod rig;
