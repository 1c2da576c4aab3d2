mod config;
mod engine;
mod input;

pub use config::{duration, format_time, total_duration, TimerConfig};
pub use engine::{IntervalTimer, Phase, PhasePolicy, TickOutcome, TimerState, TimerStatus};
pub use input::{
    countdown_from, normalize_rounds_field, normalize_time_field, stopwatch_from, tabata_from,
    xy_from, RoundsInput, TimeInput,
};
