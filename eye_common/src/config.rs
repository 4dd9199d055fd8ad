//! TOML file loading and the `[shared]` section.
//!
//! `rig.toml` and input scripts are both plain TOML documents read through
//! [`ConfigLoader`]. Errors carry the offending path so the binary can report
//! them without extra context.

use crate::consts::DEFAULT_SERVICE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a configuration or script file could not be used.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Nothing at the given path.
    #[error("{}: file not found", .0.display())]
    FileNotFound(PathBuf),

    /// Unreadable file, bad TOML, unknown key or value of the wrong type.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Well-formed but physically meaningless values.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// `[shared] log_level`; used when no `-v` or `RUST_LOG` overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every actuator write.
    Trace,
    /// Blink phases, trigger engage/release, dropped requests.
    Debug,
    /// Mode changes, blinks, startup and shutdown.
    #[default]
    Info,
    /// Input read failures, rejected channels.
    Warn,
    /// Startup failures only.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// The `[shared]` section of `rig.toml`.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "eye-rig-bench"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Default log verbosity.
    pub log_level: LogLevel,
    /// Instance name shown in logs; one rig per name.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl SharedConfig {
    /// `service_name` must be a single non-empty token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() || self.service_name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "service_name {:?} must be a non-empty name without whitespace",
                self.service_name
            )));
        }
        Ok(())
    }
}

/// Read a TOML document from disk.
///
/// Implemented for every deserializable type. Loading does not validate;
/// callers run their own `validate()` afterwards.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load and deserialize `path`.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
            _ => ConfigError::ParseError(format!("{}: {}", path.display(), e)),
        })?;
        Self::parse(&content, path)
    }

    /// Deserialize TOML text; `origin` names the source in error messages.
    fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", origin.display(), e)))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::config::RigConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rig_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn bad_closed_end_names_the_file() {
        let file = rig_file(
            "[channels.left_upper_lid]\nmin = 0.0\nmax = 80.0\nclosed = \"middle\"\n",
        );
        let err = RigConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn missing_rig_file_keeps_the_path() {
        let path = Path::new("/nonexistent/eye_rig/rig.toml");
        match RigConfig::load(path) {
            Err(ConfigError::FileNotFound(p)) => assert_eq!(p, path),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn shared_section_sets_log_level() {
        let config = RigConfig::parse(
            "[shared]\nlog_level = \"trace\"\n",
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Trace);
        assert_eq!(config.shared.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(tracing::Level::from(config.shared.log_level), tracing::Level::TRACE);
    }

    #[test]
    fn unknown_shared_key_is_rejected() {
        let result = RigConfig::parse("[shared]\nlevel = \"debug\"\n", Path::new("inline"));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn service_name_must_be_one_token() {
        let mut shared = SharedConfig::default();
        assert!(shared.validate().is_ok());
        shared.service_name = "left eye".to_string();
        assert!(matches!(shared.validate(), Err(ConfigError::ValidationError(_))));
        shared.service_name.clear();
        assert!(shared.validate().is_err());
    }
}
