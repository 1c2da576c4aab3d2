//! Workout controller.
//!
//! Owns the single authoritative [`WorkoutQueueState`] and the store it is
//! persisted to. Actions go through [`WorkoutController::dispatch`] one at
//! a time; after each one the controller snapshots the state, records a
//! finished workout in the history log and notifies subscribers.
//!
//! Storage is best effort: write failures are logged and otherwise ignored
//! so the workout keeps running.

use tracing::warn;

use super::action::Action;
use super::state::{PartialWorkoutState, Timer, WorkoutQueueState};
use crate::error::{ShareError, StorageError};
use crate::events::Event;
use crate::storage::persistence::{self, HistoryEntry};
use crate::storage::share;
use crate::storage::StateStore;
use crate::timer::TimerConfig;

type Subscriber = Box<dyn FnMut(&Event)>;

pub struct WorkoutController<S: StateStore> {
    state: WorkoutQueueState,
    store: S,
    record_history: bool,
    subscribers: Vec<Subscriber>,
}

impl<S: StateStore> WorkoutController<S> {
    /// Restore the saved workout from `store`, or start empty.
    pub fn open(store: S) -> Self {
        let state = persistence::restore_snapshot(&store);
        Self {
            state,
            store,
            record_history: true,
            subscribers: Vec::new(),
        }
    }

    /// Enable or disable the history log.
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &WorkoutQueueState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        persistence::load_history(&self.store)
    }

    /// Link that reproduces the current queue's configuration.
    pub fn share_link(&self, base_url: &str) -> Result<String, ShareError> {
        share::share_url(base_url, &self.state.configs())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Register an observer called with every event, in order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Event) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply one action. Returns the events it produced, followed by a
    /// state snapshot if anything changed.
    pub fn dispatch(&mut self, action: Action) -> Vec<Event> {
        let before = self.state.clone();
        let mut events = self.state.apply(action);

        if self.state != before {
            if let Err(e) = persistence::save_snapshot(&mut self.store, &self.state) {
                warn!(error = %e, "failed to save workout snapshot");
            }
            events.push(self.state.snapshot());
        }

        if self.record_history && !self.state.timers.is_empty() {
            for event in &events {
                if let Event::WorkoutEnded { at, .. } = event {
                    let configs = self.state.configs();
                    if let Err(e) = persistence::append_history(&mut self.store, configs, *at) {
                        warn!(error = %e, "failed to record workout history");
                    }
                }
            }
        }

        for event in &events {
            for subscriber in &mut self.subscribers {
                subscriber(event);
            }
        }
        events
    }

    pub fn add_timer(&mut self, config: TimerConfig) -> Vec<Event> {
        self.dispatch(Action::AddTimer(config))
    }

    pub fn remove_timer(&mut self, id: u64) -> Vec<Event> {
        self.dispatch(Action::RemoveTimer(id))
    }

    pub fn toggle(&mut self) -> Vec<Event> {
        self.dispatch(Action::ToggleWorkout)
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.dispatch(Action::ResetWorkout)
    }

    pub fn next(&mut self) -> Vec<Event> {
        self.dispatch(Action::NextTimer)
    }

    pub fn end(&mut self) -> Vec<Event> {
        self.dispatch(Action::EndWorkout)
    }

    pub fn tick(&mut self) -> Vec<Event> {
        self.dispatch(Action::Tick)
    }

    pub fn update_timer(&mut self, id: u64, remaining_time: u64) -> Vec<Event> {
        self.dispatch(Action::UpdateTimer { id, remaining_time })
    }

    pub fn set_timers(&mut self, timers: Vec<Timer>) -> Vec<Event> {
        self.dispatch(Action::SetTimers(timers))
    }

    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> Vec<Event> {
        self.dispatch(Action::ReorderTimer {
            from_index,
            to_index,
        })
    }

    pub fn restore(&mut self, partial: PartialWorkoutState) -> Vec<Event> {
        self.dispatch(Action::RestoreState(partial))
    }

    /// Replace the queue with `configs`, giving each a fresh id.
    pub fn load_configs(&mut self, configs: Vec<TimerConfig>) -> Vec<Event> {
        let first_id = self.state.next_timer_id;
        let timers = configs
            .into_iter()
            .zip(first_id..)
            .map(|(config, id)| Timer::new(id, config))
            .collect();
        self.set_timers(timers)
    }

    /// Load a shared link. A malformed link leaves the queue untouched.
    pub fn import_link(&mut self, link: &str) -> Vec<Event> {
        match share::decode_link(link) {
            Ok(configs) => self.load_configs(configs),
            Err(e) => {
                warn!(error = %e, "ignoring malformed workout link");
                Vec::new()
            }
        }
    }

    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        persistence::clear_history(&mut self.store)
    }

    /// Drop the saved snapshot and start from an empty queue.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        persistence::clear_snapshot(&mut self.store)?;
        self.state = WorkoutQueueState::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, STATE_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller() -> WorkoutController<MemoryStore> {
        WorkoutController::open(MemoryStore::new())
    }

    #[test]
    fn every_change_is_snapshotted() {
        let mut ctl = controller();
        ctl.add_timer(TimerConfig::countdown(0, 30));
        ctl.toggle();
        ctl.tick();

        let restored = WorkoutController::open(ctl.into_store());
        assert_eq!(restored.state().timers[0].remaining_time, 29);
        assert!(restored.state().is_workout_running);
    }

    #[test]
    fn no_op_actions_do_not_emit_snapshots() {
        let mut ctl = controller();
        let events = ctl.tick();
        assert!(events.is_empty());
        assert!(ctl.store().kv_get(STATE_KEY).unwrap().is_none());
    }

    #[test]
    fn end_appends_history() {
        let mut ctl = controller();
        ctl.add_timer(TimerConfig::countdown(0, 2));
        ctl.add_timer(TimerConfig::xy(0, 1, 2));
        ctl.toggle();
        for _ in 0..4 {
            ctl.tick();
        }
        assert!(ctl.state().is_workout_complete);

        let history = ctl.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timers.len(), 2);

        ctl.end();
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn history_can_be_disabled() {
        let mut ctl = controller().with_history(false);
        ctl.add_timer(TimerConfig::countdown(0, 2));
        ctl.end();
        assert!(ctl.history().is_empty());
    }

    #[test]
    fn empty_workout_is_not_recorded() {
        let mut ctl = controller();
        ctl.end();
        assert!(ctl.state().is_workout_complete);
        assert!(ctl.history().is_empty());
    }

    #[test]
    fn storage_failures_do_not_stop_the_workout() {
        let mut ctl = WorkoutController::open(MemoryStore::failing());
        ctl.add_timer(TimerConfig::countdown(0, 1));
        ctl.toggle();
        ctl.tick();
        assert!(ctl.state().is_workout_complete);
    }

    #[test]
    fn subscribers_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ctl = controller();
        let sink = Rc::clone(&seen);
        ctl.subscribe(move |event| {
            let name = match event {
                Event::TimerAdded { .. } => "added",
                Event::WorkoutStarted { .. } => "started",
                Event::StateSnapshot { .. } => "snapshot",
                _ => "other",
            };
            sink.borrow_mut().push(name);
        });
        ctl.add_timer(TimerConfig::countdown(0, 5));
        ctl.toggle();
        assert_eq!(
            *seen.borrow(),
            vec!["added", "snapshot", "started", "snapshot"]
        );
    }

    #[test]
    fn load_configs_assigns_fresh_ids() {
        let mut ctl = controller();
        ctl.add_timer(TimerConfig::countdown(0, 5));
        ctl.add_timer(TimerConfig::countdown(0, 5));
        ctl.load_configs(vec![TimerConfig::xy(0, 10, 3), TimerConfig::stopwatch(1, 0)]);

        let ids: Vec<u64> = ctl.state().timers.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(ctl.state().next_timer_id, 4);
        assert_eq!(ctl.state().total_workout_time, 90);
    }

    #[test]
    fn share_link_roundtrip_through_controller() {
        let mut source = controller();
        source.add_timer(TimerConfig::tabata(0, 20, 0, 10, 8));
        source.add_timer(TimerConfig::countdown(1, 0).with_description("cool down"));
        let link = source.share_link("https://example.com/add").unwrap();

        let mut target = controller();
        target.import_link(&link);
        assert_eq!(target.state().configs(), source.state().configs());
    }

    #[test]
    fn malformed_link_leaves_queue_alone() {
        let mut ctl = controller();
        ctl.add_timer(TimerConfig::countdown(0, 5));
        assert!(ctl.import_link("https://example.com/?workout=%5Bbroken").is_empty());
        assert_eq!(ctl.state().timers.len(), 1);
    }

    #[test]
    fn clear_drops_snapshot() {
        let mut ctl = controller();
        ctl.add_timer(TimerConfig::countdown(0, 5));
        ctl.clear().unwrap();
        assert!(ctl.state().timers.is_empty());
        let reopened = WorkoutController::open(ctl.into_store());
        assert!(reopened.state().timers.is_empty());
    }
}
