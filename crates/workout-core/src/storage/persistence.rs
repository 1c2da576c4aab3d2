//! Persistence gateway.
//!
//! Snapshots the whole queue state under [`STATE_KEY`] and keeps an
//! append-only history of finished workouts under [`HISTORY_KEY`]. Reads
//! never fail: a missing or corrupt record degrades to the default and is
//! logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::StateStore;
use crate::error::StorageError;
use crate::queue::{Action, PartialWorkoutState, WorkoutQueueState};
use crate::timer::TimerConfig;

pub const STATE_KEY: &str = "workoutState";
pub const HISTORY_KEY: &str = "workoutHistory";

/// One finished workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    pub timers: Vec<TimerConfig>,
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Overwrite the saved snapshot with `state`.
pub fn save_snapshot(
    store: &mut impl StateStore,
    state: &WorkoutQueueState,
) -> Result<(), StorageError> {
    let json = encode(STATE_KEY, state)?;
    store.kv_set(STATE_KEY, &json)
}

/// Load the saved snapshot, or the empty default state.
///
/// The snapshot goes through the same `RestoreState` path as a UI restore,
/// so transient flags are re-derived and the total is recomputed.
pub fn restore_snapshot(store: &impl StateStore) -> WorkoutQueueState {
    let raw = match store.kv_get(STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return WorkoutQueueState::default(),
        Err(e) => {
            warn!(error = %e, "failed to read workout snapshot, starting empty");
            return WorkoutQueueState::default();
        }
    };
    match serde_json::from_str::<PartialWorkoutState>(&raw) {
        Ok(partial) => {
            let mut state = WorkoutQueueState::default();
            state.apply(Action::RestoreState(partial));
            debug!(timers = state.timers.len(), "restored workout snapshot");
            state
        }
        Err(e) => {
            warn!(error = %e, "corrupt workout snapshot, starting empty");
            WorkoutQueueState::default()
        }
    }
}

pub fn clear_snapshot(store: &mut impl StateStore) -> Result<(), StorageError> {
    store.kv_delete(STATE_KEY)
}

/// All recorded workouts, oldest first.
pub fn load_history(store: &impl StateStore) -> Vec<HistoryEntry> {
    match store.kv_get(HISTORY_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "corrupt workout history, ignoring it");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "failed to read workout history");
            Vec::new()
        }
    }
}

pub fn append_history(
    store: &mut impl StateStore,
    timers: Vec<TimerConfig>,
    date: DateTime<Utc>,
) -> Result<(), StorageError> {
    let mut history = load_history(store);
    history.push(HistoryEntry { date, timers });
    let json = encode(HISTORY_KEY, &history)?;
    store.kv_set(HISTORY_KEY, &json)
}

pub fn clear_history(store: &mut impl StateStore) -> Result<(), StorageError> {
    store.kv_delete(HISTORY_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn sample_state() -> WorkoutQueueState {
        let mut state = WorkoutQueueState::default();
        state.apply(Action::AddTimer(TimerConfig::countdown(0, 30)));
        state.apply(Action::AddTimer(TimerConfig::tabata(0, 20, 0, 10, 2)));
        state.apply(Action::ToggleWorkout);
        state.apply(Action::Tick);
        state
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut store = MemoryStore::new();
        let state = sample_state();
        save_snapshot(&mut store, &state).unwrap();
        assert_eq!(restore_snapshot(&store), state);
    }

    #[test]
    fn missing_snapshot_is_default() {
        assert_eq!(
            restore_snapshot(&MemoryStore::new()),
            WorkoutQueueState::default()
        );
    }

    #[test]
    fn corrupt_snapshot_is_default() {
        let store = MemoryStore::new().with_value(STATE_KEY, "{not json");
        assert_eq!(restore_snapshot(&store), WorkoutQueueState::default());
    }

    #[test]
    fn restore_normalizes_active_flags() {
        let raw = r#"{
            "timers": [
                {"type":"Countdown","minutes":"00","seconds":"30","id":4,"remainingTime":12,"isActive":true}
            ],
            "currentTimerIndex": 0,
            "isWorkoutRunning": false,
            "nextTimerId": 1,
            "totalWorkoutTime": 0
        }"#;
        let store = MemoryStore::new().with_value(STATE_KEY, raw);
        let state = restore_snapshot(&store);
        assert!(!state.timers[0].is_active);
        assert_eq!(state.timers[0].remaining_time, 12);
        assert_eq!(state.total_workout_time, 30);
        assert_eq!(state.next_timer_id, 5);
    }

    #[test]
    fn history_appends() {
        let mut store = MemoryStore::new();
        let now = Utc::now();
        append_history(&mut store, vec![TimerConfig::countdown(1, 0)], now).unwrap();
        append_history(&mut store, vec![TimerConfig::xy(0, 10, 3)], now).unwrap();

        let history = load_history(&store);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].timers, vec![TimerConfig::xy(0, 10, 3)]);

        let raw = store.kv_get(HISTORY_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json[0]["date"].as_str().unwrap().contains('T'));
        assert!(json[0]["timers"][0].get("remainingTime").is_none());

        clear_history(&mut store).unwrap();
        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn corrupt_history_is_empty() {
        let store = MemoryStore::new().with_value(HISTORY_KEY, "[{]");
        assert!(load_history(&store).is_empty());
    }
}
