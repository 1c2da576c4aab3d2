use chrono::Local;
use clap::Subcommand;
use serde::Serialize;
use workout_core::{format_time, total_duration, Config};

use super::{open_controller, print_json, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List finished workouts, newest last
    List {
        /// Show only the last N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete the history log
    Clear,
}

#[derive(Serialize)]
struct HistoryRow {
    date: String,
    timers: usize,
    total: String,
}

pub fn run(action: HistoryAction, config: &Config) -> CliResult {
    let mut controller = open_controller(config)?;

    match action {
        HistoryAction::List { limit } => {
            let history = controller.history();
            let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
            let rows: Vec<HistoryRow> = history
                .iter()
                .skip(skip)
                .map(|entry| HistoryRow {
                    date: entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
                    timers: entry.timers.len(),
                    total: format_time(total_duration(&entry.timers)),
                })
                .collect();
            print_json(&rows)?;
        }
        HistoryAction::Clear => {
            controller.clear_history()?;
            println!("history cleared");
        }
    }
    Ok(())
}
