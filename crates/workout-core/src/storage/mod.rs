mod config;
pub mod database;
mod memory;
pub mod persistence;
pub mod share;

pub use config::{Config, InputDefaults, ShareConfig, TimeDefault, WorkoutConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use persistence::{HistoryEntry, HISTORY_KEY, STATE_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Durable key-value storage behind the persistence gateway.
///
/// Values are JSON documents; each write replaces the previous value.
pub trait StateStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn kv_delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `WORKOUT_TIMER_DATA_DIR` overrides the location outright. Otherwise it is
/// `~/.config/workout-timer[-dev]/`, with `WORKOUT_TIMER_ENV=dev` selecting
/// the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("WORKOUT_TIMER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("WORKOUT_TIMER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("workout-timer-dev")
            } else {
                base_dir.join("workout-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
