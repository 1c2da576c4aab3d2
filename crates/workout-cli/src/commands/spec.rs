//! Timer definitions on the command line.
//!
//! Time and round values are taken as raw text and run through the same
//! normalizer a form would use, seeded with the configured defaults.

use clap::{Args, Subcommand};
use workout_core::storage::{InputDefaults, TimeDefault};
use workout_core::timer::{
    countdown_from, stopwatch_from, tabata_from, xy_from, RoundsInput, TimeInput,
};
use workout_core::TimerConfig;

#[derive(Args, Debug, Clone)]
pub struct TimeArgs {
    /// Minutes (two digits kept)
    #[arg(short, long, allow_hyphen_values = true)]
    minutes: Option<String>,
    /// Seconds (two digits kept)
    #[arg(short, long, allow_hyphen_values = true)]
    seconds: Option<String>,
    /// Free-text description
    #[arg(short, long)]
    description: Option<String>,
}

impl TimeArgs {
    fn input(&self, default: &TimeDefault) -> TimeInput {
        let mut input = default.input();
        if let Some(minutes) = &self.minutes {
            input.set_minutes(minutes);
        }
        if let Some(seconds) = &self.seconds {
            input.set_seconds(seconds);
        }
        input
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TimerSpec {
    /// Count down from a set time
    Countdown(TimeArgs),
    /// Count up to a set time
    Stopwatch(TimeArgs),
    /// Repeat a countdown for a number of rounds
    Xy {
        #[command(flatten)]
        time: TimeArgs,
        /// Number of rounds
        #[arg(short, long)]
        rounds: Option<String>,
    },
    /// Alternate work and rest intervals
    Tabata {
        #[arg(long, allow_hyphen_values = true)]
        work_minutes: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        work_seconds: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        rest_minutes: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        rest_seconds: Option<String>,
        /// Number of work+rest rounds
        #[arg(short, long)]
        rounds: Option<String>,
        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
    },
}

fn with_description(config: TimerConfig, description: Option<String>) -> TimerConfig {
    match description {
        Some(text) if !text.trim().is_empty() => config.with_description(text),
        _ => config,
    }
}

fn rounds_input(mut input: RoundsInput, raw: Option<&str>) -> RoundsInput {
    if let Some(raw) = raw {
        input.set(raw);
    }
    input
}

impl TimerSpec {
    pub fn into_config(self, defaults: &InputDefaults) -> TimerConfig {
        match self {
            TimerSpec::Countdown(args) => {
                let time = args.input(&defaults.countdown);
                with_description(countdown_from(&time), args.description)
            }
            TimerSpec::Stopwatch(args) => {
                let time = args.input(&defaults.stopwatch);
                with_description(stopwatch_from(&time), args.description)
            }
            TimerSpec::Xy { time, rounds } => {
                let input = time.input(&defaults.xy);
                let rounds = rounds_input(defaults.xy_rounds_input(), rounds.as_deref());
                with_description(xy_from(&input, &rounds), time.description)
            }
            TimerSpec::Tabata {
                work_minutes,
                work_seconds,
                rest_minutes,
                rest_seconds,
                rounds,
                description,
            } => {
                let mut work = defaults.tabata_work.input();
                let mut rest = defaults.tabata_rest.input();
                if let Some(raw) = work_minutes {
                    work.set_minutes(&raw);
                }
                if let Some(raw) = work_seconds {
                    work.set_seconds(&raw);
                }
                if let Some(raw) = rest_minutes {
                    rest.set_minutes(&raw);
                }
                if let Some(raw) = rest_seconds {
                    rest.set_seconds(&raw);
                }
                let rounds = rounds_input(defaults.tabata_rounds_input(), rounds.as_deref());
                with_description(tabata_from(&work, &rest, &rounds), description)
            }
        }
    }
}
