//! Caller-owned configuration for warm-started solves
use std::fs;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::optimize::warm_start::StateKind;

/// Configuration for one warm-started solve
///
/// Built with [`WarmStartConfigBuilder`] or read from a JSON file, then
/// passed explicitly to
/// [`WarmStartCoordinator::new`](crate::optimize::warm_start::WarmStartCoordinator::new).
/// It is never held as process-wide state: every component that needs the
/// configuration receives it as a parameter.
///
/// # Examples
/// ```rust
/// use warmstart_core::configuration::WarmStartConfigBuilder;
/// use warmstart_core::optimize::warm_start::StateKind;
/// let config = WarmStartConfigBuilder::default()
///     .persist_path(Some("run_1.warmstart".into()))
///     .state_kind(StateKind::BasisStatus)
///     .build()
///     .unwrap();
/// assert!(config.restore_path.is_none());
/// ```
#[derive(Builder, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarmStartConfig {
    /// Path of the bundle to restore into the session before solving
    ///
    /// None disables the restore phase.
    #[builder(default = "None")]
    #[serde(default)]
    pub restore_path: Option<PathBuf>,
    /// Path to persist the captured bundle to after solving
    ///
    /// None disables the capture phase.
    #[builder(default = "None")]
    #[serde(default)]
    pub persist_path: Option<PathBuf>,
    /// Which kind of solver state to capture
    ///
    /// Basis state restores faster but only applies to continuous programs
    /// solved with simplex; primal/dual values are the safer default.
    #[builder(default = "StateKind::PrimalDual")]
    #[serde(default)]
    pub state_kind: StateKind,
    /// Skip the restore instead of failing when the restore path is absent
    ///
    /// Useful for the first run of a sweep, before any bundle exists.
    #[builder(default = "false")]
    #[serde(default)]
    pub tolerate_missing_bundle: bool,
}

impl WarmStartConfig {
    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<WarmStartConfig, ConfigError> {
        let json_data = match fs::read_to_string(&path) {
            Ok(data) => data,
            _ => return Err(ConfigError::FileNotFound(path.as_ref().to_path_buf())),
        };
        Ok(serde_json::from_str(&json_data)?)
    }
}

/// Errors associated with reading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error when the configuration file does not exist or cannot be read
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Error when the configuration file cannot be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
