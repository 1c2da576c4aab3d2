//! # Workout Timer Core Library
//!
//! This library provides the core logic for the workout timer: interval
//! timers (Stopwatch, Countdown, XY rounds, Tabata), a queue engine that
//! runs them in sequence, and the storage that lets a workout resume after
//! a restart. Front ends (the bundled CLI, or any UI) drive it through
//! actions and observe it through events.
//!
//! ## Architecture
//!
//! - **Timer**: duration calculator, input normalizer and a single
//!   interval state machine parameterized by a per-type phase policy
//! - **Queue**: the workout state, its reducer, and a controller that owns
//!   the state and persists it after every action
//! - **Storage**: SQLite key-value store, TOML configuration and
//!   shareable workout links
//!
//! ## Key Components
//!
//! - [`IntervalTimer`]: standalone timer state machine
//! - [`WorkoutQueueState`]: queue state and reducer
//! - [`WorkoutController`]: single owner of the queue state
//! - [`Database`]: durable key-value storage
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod queue;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, ShareError, StorageError};
pub use events::Event;
pub use queue::{
    reduce, sum_remaining, Action, PartialWorkoutState, Timer, WorkoutController,
    WorkoutQueueState,
};
pub use storage::{Config, Database, HistoryEntry, MemoryStore, StateStore};
pub use timer::{
    duration, format_time, total_duration, IntervalTimer, Phase, PhasePolicy, TickOutcome,
    TimerConfig, TimerState, TimerStatus,
};
