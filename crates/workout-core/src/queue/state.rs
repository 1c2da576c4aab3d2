//! Workout queue state and its reducer.
//!
//! [`WorkoutQueueState`] is an ordered list of timers plus a cursor. Every
//! mutation goes through [`WorkoutQueueState::apply`], which handles one
//! [`Action`] to completion and re-establishes the invariants before
//! returning:
//!
//! - `total_workout_time` equals the sum of the timers' full durations
//! - a complete workout is never running
//! - only the timer under the cursor of a running workout is active

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::action::Action;
use crate::events::Event;
use crate::timer::{duration, TimerConfig};

/// A queue entry: a configured timer with identity and progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    #[serde(flatten)]
    pub config: TimerConfig,
    pub id: u64,
    #[serde(default)]
    pub remaining_time: u64,
    #[serde(default)]
    pub is_active: bool,
}

impl Timer {
    /// Fresh entry with its full duration remaining.
    pub fn new(id: u64, config: TimerConfig) -> Self {
        let remaining_time = duration(&config);
        Self {
            config,
            id,
            remaining_time,
            is_active: false,
        }
    }

    pub fn duration(&self) -> u64 {
        duration(&self.config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutQueueState {
    pub timers: Vec<Timer>,
    pub current_timer_index: usize,
    pub is_workout_running: bool,
    pub is_workout_complete: bool,
    pub next_timer_id: u64,
    pub total_workout_time: u64,
}

impl Default for WorkoutQueueState {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            current_timer_index: 0,
            is_workout_running: false,
            is_workout_complete: false,
            next_timer_id: 0,
            total_workout_time: 0,
        }
    }
}

/// Any subset of [`WorkoutQueueState`] fields, overlaid by `RestoreState`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialWorkoutState {
    pub timers: Option<Vec<Timer>>,
    pub current_timer_index: Option<usize>,
    pub is_workout_running: Option<bool>,
    pub is_workout_complete: Option<bool>,
    pub next_timer_id: Option<u64>,
    pub total_workout_time: Option<u64>,
}

/// Sum of remaining seconds over `timers`.
pub fn sum_remaining(timers: &[Timer]) -> u64 {
    timers
        .iter()
        .fold(0u64, |acc, t| acc.saturating_add(t.remaining_time))
}

/// Pure reducer: next state for `action`.
pub fn reduce(state: &WorkoutQueueState, action: Action) -> WorkoutQueueState {
    let mut next = state.clone();
    next.apply(action);
    next
}

impl WorkoutQueueState {
    // ── Queries ──────────────────────────────────────────────────────

    /// Timer under the cursor, if the cursor is in range.
    pub fn active_timer(&self) -> Option<&Timer> {
        self.timers.get(self.current_timer_index)
    }

    pub fn is_last_timer(&self) -> bool {
        self.current_timer_index + 1 >= self.timers.len()
    }

    /// Seconds left in the workout from the cursor onward.
    pub fn remaining_workout_time(&self) -> u64 {
        self.timers
            .get(self.current_timer_index..)
            .map(sum_remaining)
            .unwrap_or(0)
    }

    pub fn configs(&self) -> Vec<TimerConfig> {
        self.timers.iter().map(|t| t.config.clone()).collect()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            timer_index: self.current_timer_index,
            timer_count: self.timers.len(),
            running: self.is_workout_running,
            complete: self.is_workout_complete,
            active_remaining_secs: self.active_timer().map(|t| t.remaining_time).unwrap_or(0),
            workout_remaining_secs: self.remaining_workout_time(),
            total_workout_secs: self.total_workout_time,
            at: Utc::now(),
        }
    }

    // ── Reducer ──────────────────────────────────────────────────────

    /// Apply one action and return the events it produced.
    pub fn apply(&mut self, action: Action) -> Vec<Event> {
        debug!(?action, "applying workout action");
        let mut events = Vec::new();
        match action {
            Action::AddTimer(config) => self.add_timer(config, &mut events),
            Action::RemoveTimer(id) => self.remove_timer(id, &mut events),
            Action::ToggleWorkout => self.toggle(&mut events),
            Action::ResetWorkout => self.reset(&mut events),
            Action::NextTimer => self.next_timer(&mut events),
            Action::EndWorkout => self.end(&mut events),
            Action::UpdateTimer { id, remaining_time } => {
                self.update_remaining(id, remaining_time, &mut events)
            }
            Action::SetTimers(timers) => self.replace_timers(timers, &mut events),
            Action::ReorderTimer {
                from_index,
                to_index,
            } => self.reorder(from_index, to_index, &mut events),
            Action::RestoreState(partial) => self.restore(partial, &mut events),
            Action::Tick => self.tick(&mut events),
        }
        self.settle();
        events
    }

    fn add_timer(&mut self, config: TimerConfig, events: &mut Vec<Event>) {
        let timer = Timer::new(self.next_timer_id, config);
        events.push(Event::TimerAdded {
            id: timer.id,
            kind: timer.config.kind().to_string(),
            duration_secs: timer.remaining_time,
            at: Utc::now(),
        });
        self.timers.push(timer);
        self.next_timer_id += 1;
    }

    /// The cursor is left where it is, even past the end of the queue.
    fn remove_timer(&mut self, id: u64, events: &mut Vec<Event>) {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        if self.timers.len() != before {
            events.push(Event::TimerRemoved { id, at: Utc::now() });
        }
    }

    fn toggle(&mut self, events: &mut Vec<Event>) {
        if self.is_workout_complete {
            return;
        }
        self.is_workout_running = !self.is_workout_running;
        let at = Utc::now();
        if self.is_workout_running {
            events.push(Event::WorkoutStarted {
                timer_index: self.current_timer_index,
                at,
            });
        } else {
            events.push(Event::WorkoutPaused {
                timer_index: self.current_timer_index,
                remaining_secs: self.remaining_workout_time(),
                at,
            });
        }
    }

    fn reset(&mut self, events: &mut Vec<Event>) {
        for timer in &mut self.timers {
            timer.remaining_time = timer.duration();
        }
        self.current_timer_index = 0;
        self.is_workout_running = false;
        self.is_workout_complete = false;
        events.push(Event::WorkoutReset { at: Utc::now() });
    }

    fn next_timer(&mut self, events: &mut Vec<Event>) {
        if self.current_timer_index + 1 < self.timers.len() {
            let from = self.current_timer_index;
            self.current_timer_index += 1;
            events.push(Event::TimerAdvanced {
                from_index: from,
                to_index: self.current_timer_index,
                at: Utc::now(),
            });
        } else if !self.is_workout_complete {
            self.is_workout_complete = true;
            self.is_workout_running = false;
            events.push(Event::WorkoutCompleted { at: Utc::now() });
        }
    }

    fn end(&mut self, events: &mut Vec<Event>) {
        let already_complete = self.is_workout_complete;
        self.is_workout_running = false;
        self.is_workout_complete = true;
        for timer in &mut self.timers {
            timer.remaining_time = 0;
        }
        if !already_complete {
            info!(timers = self.timers.len(), "workout ended");
            events.push(Event::WorkoutEnded {
                timer_count: self.timers.len(),
                total_secs: self.total_workout_time,
                at: Utc::now(),
            });
        }
    }

    fn update_remaining(&mut self, id: u64, remaining_time: u64, events: &mut Vec<Event>) {
        if let Some(timer) = self.timers.iter_mut().find(|t| t.id == id) {
            timer.remaining_time = remaining_time;
            events.push(Event::TimerUpdated {
                id,
                remaining_secs: remaining_time,
                at: Utc::now(),
            });
        }
    }

    /// Ids come from the input; the id counter is raised past them so a
    /// later `AddTimer` never reuses one.
    fn replace_timers(&mut self, timers: Vec<Timer>, events: &mut Vec<Event>) {
        self.timers = timers
            .into_iter()
            .map(|t| Timer::new(t.id, t.config))
            .collect();
        if let Some(max_id) = self.timers.iter().map(|t| t.id).max() {
            self.next_timer_id = self.next_timer_id.max(max_id + 1);
        }
        events.push(Event::TimersReplaced {
            count: self.timers.len(),
            at: Utc::now(),
        });
    }

    /// Splice-move; the cursor follows to `to_index`.
    fn reorder(&mut self, from_index: usize, to_index: usize, events: &mut Vec<Event>) {
        if from_index >= self.timers.len() {
            return;
        }
        let timer = self.timers.remove(from_index);
        let to_index = to_index.min(self.timers.len());
        self.timers.insert(to_index, timer);
        self.current_timer_index = to_index;
        events.push(Event::TimerReordered {
            from_index,
            to_index,
            at: Utc::now(),
        });
    }

    fn restore(&mut self, partial: PartialWorkoutState, events: &mut Vec<Event>) {
        if let Some(mut timers) = partial.timers {
            for timer in &mut timers {
                timer.is_active = false;
            }
            self.timers = timers;
        }
        if let Some(index) = partial.current_timer_index {
            self.current_timer_index = index;
        }
        if let Some(running) = partial.is_workout_running {
            self.is_workout_running = running;
        }
        if let Some(complete) = partial.is_workout_complete {
            self.is_workout_complete = complete;
        }
        if let Some(next_id) = partial.next_timer_id {
            self.next_timer_id = next_id;
        }
        if let Some(max_id) = self.timers.iter().map(|t| t.id).max() {
            self.next_timer_id = self.next_timer_id.max(max_id + 1);
        }
        events.push(Event::StateRestored { at: Utc::now() });
    }

    /// Count the active timer down one second. A timer that reaches zero
    /// hands over to the next one in the same tick; the last one ends the
    /// workout.
    fn tick(&mut self, events: &mut Vec<Event>) {
        if !self.is_workout_running || self.is_workout_complete {
            return;
        }
        let Some(timer) = self.timers.get_mut(self.current_timer_index) else {
            return;
        };
        timer.remaining_time = timer.remaining_time.saturating_sub(1);
        if timer.remaining_time > 0 {
            return;
        }
        if self.is_last_timer() {
            self.end(events);
        } else {
            self.next_timer(events);
        }
    }

    fn settle(&mut self) {
        self.total_workout_time = self
            .timers
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.duration()));
        if self.is_workout_complete {
            self.is_workout_running = false;
        }
        let active = if self.is_workout_running {
            Some(self.current_timer_index)
        } else {
            None
        };
        for (i, timer) in self.timers.iter_mut().enumerate() {
            timer.is_active = active == Some(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn queue(configs: &[TimerConfig]) -> WorkoutQueueState {
        let mut state = WorkoutQueueState::default();
        for cfg in configs {
            state.apply(Action::AddTimer(cfg.clone()));
        }
        state
    }

    fn ticks(state: &mut WorkoutQueueState, n: usize) {
        for _ in 0..n {
            state.apply(Action::Tick);
        }
    }

    #[test]
    fn add_assigns_monotonic_ids() {
        let mut state = queue(&[TimerConfig::countdown(0, 30), TimerConfig::xy(0, 10, 3)]);
        assert_eq!(state.timers[0].id, 0);
        assert_eq!(state.timers[1].id, 1);
        assert_eq!(state.timers[1].remaining_time, 30);
        assert_eq!(state.total_workout_time, 60);

        state.apply(Action::RemoveTimer(1));
        state.apply(Action::AddTimer(TimerConfig::stopwatch(1, 0)));
        assert_eq!(state.timers[1].id, 2);
        assert_eq!(state.next_timer_id, 3);
        assert_eq!(state.total_workout_time, 90);
    }

    #[test]
    fn remove_unknown_id_is_silent() {
        let mut state = queue(&[TimerConfig::countdown(0, 30)]);
        let events = state.apply(Action::RemoveTimer(42));
        assert!(events.is_empty());
        assert_eq!(state.timers.len(), 1);
    }

    #[test]
    fn remove_active_timer_leaves_cursor_out_of_range() {
        let mut state = queue(&[TimerConfig::countdown(0, 5), TimerConfig::countdown(0, 5)]);
        state.apply(Action::NextTimer);
        state.apply(Action::RemoveTimer(1));
        assert_eq!(state.current_timer_index, 1);
        assert!(state.active_timer().is_none());
        assert_eq!(state.remaining_workout_time(), 0);

        state.apply(Action::ToggleWorkout);
        let before = state.clone();
        state.apply(Action::Tick);
        assert_eq!(state.timers, before.timers);
    }

    #[test]
    fn sequencing_hands_over_in_the_same_tick() {
        let mut state = queue(&[TimerConfig::countdown(0, 30), TimerConfig::countdown(0, 20)]);
        state.apply(Action::ToggleWorkout);

        ticks(&mut state, 30);
        assert_eq!(state.current_timer_index, 1);
        assert_eq!(state.timers[1].remaining_time, 20);
        assert!(state.timers[1].is_active);
        assert!(!state.timers[0].is_active);

        ticks(&mut state, 20);
        assert!(state.is_workout_complete);
        assert!(!state.is_workout_running);
        assert_eq!(state.timers[0].remaining_time, 0);
        assert_eq!(state.timers[1].remaining_time, 0);
    }

    #[test]
    fn paused_queue_ignores_ticks() {
        let mut state = queue(&[TimerConfig::countdown(0, 30)]);
        ticks(&mut state, 5);
        assert_eq!(state.timers[0].remaining_time, 30);

        state.apply(Action::ToggleWorkout);
        ticks(&mut state, 5);
        state.apply(Action::ToggleWorkout);
        ticks(&mut state, 5);
        assert_eq!(state.timers[0].remaining_time, 25);
    }

    #[test]
    fn next_on_last_marks_complete() {
        let mut state = queue(&[TimerConfig::countdown(0, 30)]);
        state.apply(Action::ToggleWorkout);
        let events = state.apply(Action::NextTimer);
        assert!(matches!(events[0], Event::WorkoutCompleted { .. }));
        assert!(state.is_workout_complete);
        assert!(!state.is_workout_running);
        assert_eq!(state.timers[0].remaining_time, 30);
    }

    #[test]
    fn toggle_is_ignored_once_complete() {
        let mut state = queue(&[TimerConfig::countdown(0, 30)]);
        state.apply(Action::EndWorkout);
        assert!(state.apply(Action::ToggleWorkout).is_empty());
        assert!(!state.is_workout_running);
    }

    #[test]
    fn end_zeroes_everything_once() {
        let mut state = queue(&[TimerConfig::countdown(0, 30), TimerConfig::xy(0, 5, 2)]);
        state.apply(Action::ToggleWorkout);
        let events = state.apply(Action::EndWorkout);
        assert!(matches!(events[0], Event::WorkoutEnded { timer_count: 2, total_secs: 40, .. }));
        assert!(state.timers.iter().all(|t| t.remaining_time == 0));
        assert_eq!(state.total_workout_time, 40);

        assert!(state.apply(Action::EndWorkout).is_empty());
    }

    #[test]
    fn reset_restores_durations() {
        let mut state = queue(&[TimerConfig::countdown(0, 3), TimerConfig::countdown(0, 4)]);
        state.apply(Action::ToggleWorkout);
        ticks(&mut state, 5);
        state.apply(Action::ResetWorkout);
        assert_eq!(state.current_timer_index, 0);
        assert!(!state.is_workout_running);
        assert!(!state.is_workout_complete);
        assert_eq!(sum_remaining(&state.timers), 7);
    }

    #[test]
    fn reorder_moves_and_cursor_follows() {
        let mut state = queue(&[
            TimerConfig::countdown(0, 1),
            TimerConfig::countdown(0, 2),
            TimerConfig::countdown(0, 3),
        ]);
        state.apply(Action::ReorderTimer {
            from_index: 2,
            to_index: 0,
        });
        let ids: Vec<u64> = state.timers.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 0, 1]);
        assert_eq!(state.current_timer_index, 0);

        state.apply(Action::ReorderTimer {
            from_index: 0,
            to_index: 9,
        });
        let ids: Vec<u64> = state.timers.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(state.current_timer_index, 2);

        assert!(state
            .apply(Action::ReorderTimer {
                from_index: 7,
                to_index: 0
            })
            .is_empty());
    }

    #[test]
    fn update_sets_one_timer() {
        let mut state = queue(&[TimerConfig::countdown(0, 30), TimerConfig::countdown(0, 20)]);
        state.apply(Action::UpdateTimer {
            id: 1,
            remaining_time: 7,
        });
        assert_eq!(state.timers[1].remaining_time, 7);
        assert_eq!(state.total_workout_time, 50);
        assert_eq!(state.remaining_workout_time(), 37);
    }

    #[test]
    fn set_timers_recomputes_and_keeps_ids() {
        let mut state = queue(&[TimerConfig::countdown(0, 30)]);
        let mut incoming = Timer::new(7, TimerConfig::xy(0, 10, 2));
        incoming.remaining_time = 3;
        incoming.is_active = true;
        state.apply(Action::SetTimers(vec![incoming]));

        assert_eq!(state.timers[0].id, 7);
        assert_eq!(state.timers[0].remaining_time, 20);
        assert!(!state.timers[0].is_active);
        assert_eq!(state.total_workout_time, 20);
        assert_eq!(state.next_timer_id, 8);
    }

    #[test]
    fn restore_overlays_given_fields() {
        let mut state = queue(&[TimerConfig::countdown(0, 30)]);
        state.apply(Action::RestoreState(PartialWorkoutState {
            current_timer_index: Some(0),
            is_workout_running: Some(true),
            is_workout_complete: Some(true),
            total_workout_time: Some(999),
            ..Default::default()
        }));
        assert_eq!(state.timers.len(), 1);
        assert!(state.is_workout_complete);
        assert!(!state.is_workout_running);
        assert_eq!(state.total_workout_time, 30);
    }

    #[test]
    fn reduce_leaves_input_untouched() {
        let state = queue(&[TimerConfig::countdown(0, 30)]);
        let next = reduce(&state, Action::ToggleWorkout);
        assert!(!state.is_workout_running);
        assert!(next.is_workout_running);
    }

    #[test]
    fn serializes_camel_case_with_flattened_config() {
        let state = queue(&[TimerConfig::tabata(0, 20, 0, 10, 8)]);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentTimerIndex"], 0);
        assert_eq!(json["totalWorkoutTime"], 240);
        assert_eq!(json["timers"][0]["type"], "Tabata");
        assert_eq!(json["timers"][0]["workSeconds"], 20);
        assert_eq!(json["timers"][0]["remainingTime"], 240);
    }

    fn any_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0u64..5, 0u64..60).prop_map(|(m, s)| Action::AddTimer(TimerConfig::countdown(m, s))),
            (0u64..3, 0u64..60, 1u64..4)
                .prop_map(|(m, s, r)| Action::AddTimer(TimerConfig::xy(m, s, r))),
            (0u64..8).prop_map(Action::RemoveTimer),
            Just(Action::ToggleWorkout),
            Just(Action::ResetWorkout),
            Just(Action::NextTimer),
            Just(Action::EndWorkout),
            Just(Action::Tick),
            (0u64..8, 0u64..100).prop_map(|(id, t)| Action::UpdateTimer {
                id,
                remaining_time: t
            }),
            (0usize..6, 0usize..6).prop_map(|(f, t)| Action::ReorderTimer {
                from_index: f,
                to_index: t
            }),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_after_any_sequence(actions in proptest::collection::vec(any_action(), 0..60)) {
            let mut state = WorkoutQueueState::default();
            for action in actions {
                state.apply(action);
                let expected: u64 = state.timers.iter().map(Timer::duration).sum();
                prop_assert_eq!(state.total_workout_time, expected);
                prop_assert!(!(state.is_workout_complete && state.is_workout_running));
                prop_assert!(state.timers.iter().filter(|t| t.is_active).count() <= 1);
            }
        }

        #[test]
        fn paused_tick_changes_nothing(actions in proptest::collection::vec(any_action(), 0..30)) {
            let mut state = WorkoutQueueState::default();
            for action in actions {
                state.apply(action);
            }
            if state.is_workout_running {
                state.apply(Action::ToggleWorkout);
            }
            let before = state.clone();
            state.apply(Action::Tick);
            prop_assert_eq!(state, before);
        }
    }
}
