//! TOML-based application configuration.
//!
//! Stores the starting point of a FocusBeam process:
//! - Minutes for each session type
//! - Which session type is selected on launch
//!
//! Configuration is stored at `~/.config/focusbeam/config.toml`. It is only
//! read at startup; durations adjusted in a running session are not written
//! back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{DurationConfig, SessionTimer, SessionType};

/// Initial minutes per session type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationsConfig {
    #[serde(default = "default_focus")]
    pub focus: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
}

/// Timer startup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_start_type")]
    pub start_type: SessionType,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusbeam/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub durations: DurationsConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

fn default_focus() -> u32 {
    SessionType::Focus.default_minutes()
}
fn default_short_break() -> u32 {
    SessionType::ShortBreak.default_minutes()
}
fn default_long_break() -> u32 {
    SessionType::LongBreak.default_minutes()
}
fn default_start_type() -> SessionType {
    SessionType::Focus
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            start_type: default_start_type(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            tracing::debug!(path = %path.display(), "wrote default config");
            Ok(cfg)
        }
    }

    /// Load and parse a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check that every duration is inside its session type's bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (session, minutes) in self.raw_durations() {
            let (min, max) = session.bounds();
            if minutes < min || minutes > max {
                return Err(ConfigError::InvalidValue {
                    key: format!("durations.{}", session.as_str()),
                    message: format!("{minutes} is outside {min}..={max}"),
                });
            }
        }
        Ok(())
    }

    /// Durations clamped into bounds. Out-of-range values from a hand-edited
    /// file are logged and clamped rather than rejected.
    pub fn durations(&self) -> DurationConfig {
        for (session, minutes) in self.raw_durations() {
            if session.clamp_minutes(i64::from(minutes)) != minutes {
                tracing::warn!(
                    session = session.as_str(),
                    minutes,
                    "configured duration out of range, clamping"
                );
            }
        }
        DurationConfig::new(
            self.durations.focus,
            self.durations.short_break,
            self.durations.long_break,
        )
    }

    /// A fresh idle timer seeded from this configuration.
    pub fn session_timer(&self) -> SessionTimer {
        SessionTimer::new(self.durations(), self.timer.start_type)
    }

    fn raw_durations(&self) -> [(SessionType, u32); 3] {
        [
            (SessionType::Focus, self.durations.focus),
            (SessionType::ShortBreak, self.durations.short_break),
            (SessionType::LongBreak, self.durations.long_break),
        ]
    }
}
