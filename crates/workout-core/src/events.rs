use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change of the workout queue produces an Event.
/// Subscribers (a UI, the CLI printer) react to them; none can mutate state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerAdded {
        id: u64,
        kind: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerRemoved {
        id: u64,
        at: DateTime<Utc>,
    },
    TimerUpdated {
        id: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimersReplaced {
        count: usize,
        at: DateTime<Utc>,
    },
    TimerReordered {
        from_index: usize,
        to_index: usize,
        at: DateTime<Utc>,
    },
    WorkoutStarted {
        timer_index: usize,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        timer_index: usize,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerAdvanced {
        from_index: usize,
        to_index: usize,
        at: DateTime<Utc>,
    },
    /// Cursor ran past the last timer.
    WorkoutCompleted {
        at: DateTime<Utc>,
    },
    /// Workout forced to its end; every remaining time is zero.
    WorkoutEnded {
        timer_count: usize,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    WorkoutReset {
        at: DateTime<Utc>,
    },
    StateRestored {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        timer_index: usize,
        timer_count: usize,
        running: bool,
        complete: bool,
        active_remaining_secs: u64,
        workout_remaining_secs: u64,
        total_workout_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_snapshot(&self) -> bool {
        matches!(self, Event::StateSnapshot { .. })
    }
}
