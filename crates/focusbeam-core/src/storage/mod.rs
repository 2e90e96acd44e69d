mod config;

pub use config::{Config, DurationsConfig, TimerConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/focusbeam[-dev]/` based on FOCUSBEAM_ENV.
///
/// Set FOCUSBEAM_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(".config");

    let env = std::env::var("FOCUSBEAM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusbeam-dev")
    } else {
        base_dir.join("focusbeam")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
