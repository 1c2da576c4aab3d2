//! Standalone interval timer.
//!
//! One state machine drives every timer type; what happens when the
//! current unit (a countdown, a round, a work or rest phase) completes is
//! decided by its [`PhasePolicy`]. The timer has no clock of its own: the
//! caller invokes `tick()` once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Finished
//!   ^________________________________|  (reset from any state)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = IntervalTimer::from_config(&TimerConfig::xy(0, 10, 3));
//! timer.start();
//! // Once per second:
//! if let Some(outcome) = timer.tick() { /* round advanced, finished, ... */ }
//! ```

use serde::{Deserialize, Serialize};

use super::config::{clock_secs, TimerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Tabata sub-phase. Other timer types stay in `Work`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

/// What to do when the current unit runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum PhasePolicy {
    /// Count down once, then finish.
    Countdown { duration_secs: u64 },
    /// Count up to the target, then finish.
    Stopwatch { target_secs: u64 },
    /// Count down each round, reloading until the last one.
    Rounds { round_secs: u64, rounds: u64 },
    /// Alternate work and rest; a round is one work+rest pair.
    Tabata {
        work_secs: u64,
        rest_secs: u64,
        rounds: u64,
    },
}

/// Notable transition produced by `tick()` or `forward()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    RoundAdvanced { round: u64 },
    PhaseChanged { phase: Phase, round: u64 },
    Finished,
}

enum Transition {
    Finish,
    NextRound,
    ToRest,
}

impl PhasePolicy {
    pub fn from_config(config: &TimerConfig) -> Self {
        match config {
            TimerConfig::Countdown { .. } | TimerConfig::Unknown => Self::Countdown {
                duration_secs: config.duration_secs(),
            },
            TimerConfig::Stopwatch { .. } => Self::Stopwatch {
                target_secs: config.duration_secs(),
            },
            TimerConfig::XY {
                minutes,
                seconds,
                rounds,
                ..
            } => Self::Rounds {
                round_secs: clock_secs(*minutes, *seconds),
                rounds: (*rounds).max(1),
            },
            TimerConfig::Tabata {
                work_minutes,
                work_seconds,
                rest_minutes,
                rest_seconds,
                rounds,
                ..
            } => Self::Tabata {
                work_secs: clock_secs(*work_minutes, *work_seconds),
                rest_secs: clock_secs(*rest_minutes, *rest_seconds),
                rounds: (*rounds).max(1),
            },
        }
    }

    fn counts_up(&self) -> bool {
        matches!(self, Self::Stopwatch { .. })
    }

    fn total_rounds(&self) -> u64 {
        match self {
            Self::Rounds { rounds, .. } | Self::Tabata { rounds, .. } => *rounds,
            Self::Countdown { .. } | Self::Stopwatch { .. } => 1,
        }
    }

    /// Counter value at the start of a unit.
    fn unit_start(&self, phase: Phase) -> u64 {
        match (self, phase) {
            (Self::Countdown { duration_secs }, _) => *duration_secs,
            (Self::Stopwatch { .. }, _) => 0,
            (Self::Rounds { round_secs, .. }, _) => *round_secs,
            (Self::Tabata { work_secs, .. }, Phase::Work) => *work_secs,
            (Self::Tabata { rest_secs, .. }, Phase::Rest) => *rest_secs,
        }
    }

    /// Counter value at which a unit is complete.
    fn unit_end(&self) -> u64 {
        match self {
            Self::Stopwatch { target_secs } => *target_secs,
            _ => 0,
        }
    }

    fn on_unit_complete(&self, round: u64, phase: Phase) -> Transition {
        match self {
            Self::Countdown { .. } | Self::Stopwatch { .. } => Transition::Finish,
            Self::Rounds { rounds, .. } if round < *rounds => Transition::NextRound,
            Self::Rounds { .. } => Transition::Finish,
            Self::Tabata { .. } if phase == Phase::Work => Transition::ToRest,
            Self::Tabata { rounds, .. } if round < *rounds => Transition::NextRound,
            Self::Tabata { .. } => Transition::Finish,
        }
    }
}

/// Display-oriented view of a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStatus {
    pub state: TimerState,
    pub phase: Phase,
    pub round: u64,
    pub total_rounds: u64,
    /// Remaining seconds, or elapsed seconds for a stopwatch.
    pub display_secs: u64,
    pub label: String,
}

/// Generic interval state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTimer {
    policy: PhasePolicy,
    state: TimerState,
    /// Remaining seconds of the current unit, or elapsed seconds when
    /// counting up.
    counter: u64,
    round: u64,
    phase: Phase,
}

impl IntervalTimer {
    pub fn new(policy: PhasePolicy) -> Self {
        let counter = policy.unit_start(Phase::Work);
        Self {
            policy,
            state: TimerState::Idle,
            counter,
            round: 1,
            phase: Phase::Work,
        }
    }

    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(PhasePolicy::from_config(config))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn policy(&self) -> &PhasePolicy {
        &self.policy
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Remaining seconds in the current unit (elapsed for a stopwatch).
    pub fn display_secs(&self) -> u64 {
        self.counter
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn status(&self) -> TimerStatus {
        let total_rounds = self.policy.total_rounds();
        let label = match (&self.policy, self.state, self.phase) {
            (_, TimerState::Finished, _) => "Done!".to_string(),
            (PhasePolicy::Tabata { .. }, _, Phase::Rest) => "Rest".to_string(),
            (PhasePolicy::Rounds { .. } | PhasePolicy::Tabata { .. }, _, _) => {
                format!("Round {} of {}", self.round, total_rounds)
            }
            _ => String::new(),
        };
        TimerStatus {
            state: self.state,
            phase: self.phase,
            round: self.round,
            total_rounds,
            display_secs: self.counter,
            label,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. Starting a finished timer rearms it first.
    pub fn start(&mut self) -> bool {
        match self.state {
            TimerState::Running => false,
            TimerState::Finished => {
                self.rearm();
                self.state = TimerState::Running;
                true
            }
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                true
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        true
    }

    /// Start/Pause button semantics.
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) {
        self.rearm();
        self.state = TimerState::Idle;
    }

    /// Advance one second. No-op unless running.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.state != TimerState::Running {
            return None;
        }
        // Only a zero-length first unit can already be done here.
        let mut outcome = None;
        if self.unit_done() {
            outcome = Some(self.complete_units());
            if self.state == TimerState::Finished {
                return outcome;
            }
        }
        self.counter = if self.policy.counts_up() {
            self.counter.saturating_add(1)
        } else {
            self.counter.saturating_sub(1)
        };
        if self.unit_done() {
            outcome = Some(self.complete_units());
        }
        outcome
    }

    /// Jump the current unit to completion, as if it had just run out.
    pub fn forward(&mut self) -> Option<TickOutcome> {
        if self.state == TimerState::Finished {
            return None;
        }
        self.counter = self.policy.unit_end();
        Some(self.complete_units())
    }

    /// Force the whole timer to its finished position.
    pub fn end(&mut self) {
        self.counter = self.policy.unit_end();
        self.round = self.policy.total_rounds();
        if matches!(self.policy, PhasePolicy::Tabata { .. }) {
            self.phase = Phase::Rest;
        }
        self.state = TimerState::Finished;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn unit_done(&self) -> bool {
        if self.policy.counts_up() {
            self.counter >= self.policy.unit_end()
        } else {
            self.counter == 0
        }
    }

    /// Complete the current unit and any zero-length units after it.
    /// Returns the last transition.
    fn complete_units(&mut self) -> TickOutcome {
        loop {
            let outcome = self.complete_unit();
            if self.state == TimerState::Finished || !self.unit_done() {
                return outcome;
            }
        }
    }

    fn complete_unit(&mut self) -> TickOutcome {
        match self.policy.on_unit_complete(self.round, self.phase) {
            Transition::Finish => {
                self.state = TimerState::Finished;
                TickOutcome::Finished
            }
            Transition::ToRest => {
                self.phase = Phase::Rest;
                self.counter = self.policy.unit_start(Phase::Rest);
                TickOutcome::PhaseChanged {
                    phase: Phase::Rest,
                    round: self.round,
                }
            }
            Transition::NextRound => {
                self.round += 1;
                self.phase = Phase::Work;
                self.counter = self.policy.unit_start(Phase::Work);
                if matches!(self.policy, PhasePolicy::Tabata { .. }) {
                    TickOutcome::PhaseChanged {
                        phase: Phase::Work,
                        round: self.round,
                    }
                } else {
                    TickOutcome::RoundAdvanced { round: self.round }
                }
            }
        }
    }

    fn rearm(&mut self) {
        self.round = 1;
        self.phase = Phase::Work;
        self.counter = self.policy.unit_start(Phase::Work);
    }
}
