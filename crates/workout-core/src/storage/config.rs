//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default form values for each timer type
//! - Workout clock and history behavior
//! - Base URL for shareable workout links
//!
//! Configuration is stored at `~/.config/workout-timer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{RoundsInput, TimeInput};

/// Minutes/seconds pair used to seed a time input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDefault {
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeDefault {
    fn new(minutes: u64, seconds: u64) -> Self {
        Self { minutes, seconds }
    }

    pub fn input(&self) -> TimeInput {
        TimeInput::from_values(self.minutes, self.seconds)
    }
}

/// Default form values per timer type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDefaults {
    #[serde(default = "default_countdown")]
    pub countdown: TimeDefault,
    #[serde(default = "default_stopwatch")]
    pub stopwatch: TimeDefault,
    #[serde(default = "default_xy")]
    pub xy: TimeDefault,
    #[serde(default = "default_xy_rounds")]
    pub xy_rounds: u64,
    #[serde(default = "default_tabata_work")]
    pub tabata_work: TimeDefault,
    #[serde(default = "default_tabata_rest")]
    pub tabata_rest: TimeDefault,
    #[serde(default = "default_tabata_rounds")]
    pub tabata_rounds: u64,
}

impl InputDefaults {
    pub fn xy_rounds_input(&self) -> RoundsInput {
        RoundsInput::new(&self.xy_rounds.to_string())
    }

    pub fn tabata_rounds_input(&self) -> RoundsInput {
        RoundsInput::new(&self.tabata_rounds.to_string())
    }
}

/// Workout run behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Milliseconds between ticks of the live run loop.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Append finished workouts to the history log.
    #[serde(default = "default_true")]
    pub record_history: bool,
}

/// Share link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/workout-timer/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: InputDefaults,
    #[serde(default)]
    pub workout: WorkoutConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

// Default functions
fn default_countdown() -> TimeDefault {
    TimeDefault::new(2, 30)
}
fn default_stopwatch() -> TimeDefault {
    TimeDefault::new(2, 30)
}
fn default_xy() -> TimeDefault {
    TimeDefault::new(1, 30)
}
fn default_xy_rounds() -> u64 {
    10
}
fn default_tabata_work() -> TimeDefault {
    TimeDefault::new(1, 30)
}
fn default_tabata_rest() -> TimeDefault {
    TimeDefault::new(0, 20)
}
fn default_tabata_rounds() -> u64 {
    8
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}
fn default_base_url() -> String {
    "https://workout-timer.local/add".into()
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            countdown: default_countdown(),
            stopwatch: default_stopwatch(),
            xy: default_xy(),
            xy_rounds: default_xy_rounds(),
            tabata_work: default_tabata_work(),
            tabata_rest: default_tabata_rest(),
            tabata_rounds: default_tabata_rounds(),
        }
    }
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            record_history: true,
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(e.to_string()))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> crate::error::Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                }
                .into()
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            Self::default()
        })
    }
}
