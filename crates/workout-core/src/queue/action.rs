use serde::{Deserialize, Serialize};

use super::state::{PartialWorkoutState, Timer};
use crate::timer::TimerConfig;

/// Discriminated action consumed by [`WorkoutQueueState::apply`](super::WorkoutQueueState::apply).
///
/// Wire form is `{"type": "ADD_TIMER", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddTimer(TimerConfig),
    RemoveTimer(u64),
    ToggleWorkout,
    ResetWorkout,
    NextTimer,
    EndWorkout,
    UpdateTimer {
        id: u64,
        #[serde(rename = "remainingTime")]
        remaining_time: u64,
    },
    SetTimers(Vec<Timer>),
    ReorderTimer {
        #[serde(rename = "fromIndex")]
        from_index: usize,
        #[serde(rename = "toIndex")]
        to_index: usize,
    },
    RestoreState(PartialWorkoutState),
    /// One second of wall clock while the workout runs.
    Tick,
}
