//! Timer input normalization.
//!
//! Raw minute/second/round text from a form is coerced into canonical
//! fields rather than rejected. Time fields are always exactly two digits;
//! round fields are digits only.

use super::config::{clock_secs, TimerConfig};

/// Strip non-digits, left-pad to two digits, keep the first two.
///
/// Empty input normalizes to `"00"`.
pub fn normalize_time_field(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    format!("{digits:0>2}").chars().take(2).collect()
}

/// Strip non-digits from a rounds field. May be empty.
pub fn normalize_rounds_field(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn field_value(field: &str) -> u64 {
    field.parse().unwrap_or(0)
}

/// A minutes channel and a seconds channel folded into one live duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInput {
    minutes: String,
    seconds: String,
    calculated_time: u64,
}

impl TimeInput {
    pub fn new(minutes: &str, seconds: &str) -> Self {
        let mut input = Self {
            minutes: normalize_time_field(minutes),
            seconds: normalize_time_field(seconds),
            calculated_time: 0,
        };
        input.recalculate();
        input
    }

    /// Build from numeric defaults (values above 99 keep their first two digits).
    pub fn from_values(minutes: u64, seconds: u64) -> Self {
        Self::new(&minutes.to_string(), &seconds.to_string())
    }

    pub fn set_minutes(&mut self, raw: &str) {
        self.minutes = normalize_time_field(raw);
        self.recalculate();
    }

    pub fn set_seconds(&mut self, raw: &str) {
        self.seconds = normalize_time_field(raw);
        self.recalculate();
    }

    pub fn minutes_text(&self) -> &str {
        &self.minutes
    }

    pub fn seconds_text(&self) -> &str {
        &self.seconds
    }

    pub fn minutes(&self) -> u64 {
        field_value(&self.minutes)
    }

    pub fn seconds(&self) -> u64 {
        field_value(&self.seconds)
    }

    /// Derived duration in seconds, updated on every change.
    pub fn calculated_time(&self) -> u64 {
        self.calculated_time
    }

    fn recalculate(&mut self) {
        self.calculated_time = clock_secs(self.minutes(), self.seconds());
    }
}

/// Round count text field with a form default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundsInput {
    rounds: String,
    default: String,
}

impl RoundsInput {
    pub fn new(default: &str) -> Self {
        let default = normalize_rounds_field(default);
        Self {
            rounds: default.clone(),
            default,
        }
    }

    pub fn set(&mut self, raw: &str) {
        self.rounds = normalize_rounds_field(raw);
    }

    /// Restore the form default.
    pub fn reset(&mut self) {
        self.rounds = self.default.clone();
    }

    pub fn text(&self) -> &str {
        &self.rounds
    }

    /// Parsed round count, never below one.
    pub fn value(&self) -> u64 {
        field_value(&self.rounds).max(1)
    }
}

impl Default for RoundsInput {
    fn default() -> Self {
        Self::new("10")
    }
}

// ── Config builders ──────────────────────────────────────────────────

pub fn countdown_from(time: &TimeInput) -> TimerConfig {
    TimerConfig::countdown(time.minutes(), time.seconds())
}

pub fn stopwatch_from(time: &TimeInput) -> TimerConfig {
    TimerConfig::stopwatch(time.minutes(), time.seconds())
}

pub fn xy_from(time: &TimeInput, rounds: &RoundsInput) -> TimerConfig {
    TimerConfig::xy(time.minutes(), time.seconds(), rounds.value())
}

pub fn tabata_from(work: &TimeInput, rest: &TimeInput, rounds: &RoundsInput) -> TimerConfig {
    TimerConfig::tabata(
        work.minutes(),
        work.seconds(),
        rest.minutes(),
        rest.seconds(),
        rounds.value(),
    )
}
