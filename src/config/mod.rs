//! Configuration management for the vigil application.
//!
//! This module handles resolving the data directory from the CLI flag and
//! environment, with a sensible default. Tunable session parameters
//! (batch size, fallback tag) live in the data directory's `params.json`
//! and are loaded by the store, not here.
//!
//! # Environment Variables
//!
//! - `VIGIL_DIR`: Path to the data directory (defaults to ~/.vigil)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{DEFAULT_DATA_SUBDIR, ENV_VAR_HOME, ENV_VAR_VIGIL_DIR};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the vigil application.
///
/// Resolution order for the data directory: the `--data-dir` flag, then the
/// `VIGIL_DIR` environment variable, then `~/.vigil`. The path is expanded
/// with `shellexpand` so `~` and environment references work.
pub struct Config {
    /// Directory holding all data files for the journal.
    pub data_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .finish()
    }
}

impl Config {
    /// Resolves configuration from the optional CLI override and environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if path expansion fails or the resolved
    /// path is empty.
    pub fn load(data_dir_flag: Option<&str>) -> AppResult<Self> {
        let raw = match data_dir_flag {
            Some(dir) => dir.to_string(),
            None => env::var(ENV_VAR_VIGIL_DIR).unwrap_or_else(|_| {
                let home = env::var(ENV_VAR_HOME).unwrap_or_default();
                format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
            }),
        };

        let expanded = shellexpand::full(&raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        Ok(Config { data_dir })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the data directory path is empty or
    /// not absolute.
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }
}
