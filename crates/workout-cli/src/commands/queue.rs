use clap::Subcommand;
use serde::Serialize;
use workout_core::{format_time, Config, Timer};

use super::spec::TimerSpec;
use super::{open_controller, print_json, CliResult};

#[derive(Subcommand)]
pub enum QueueAction {
    /// Append a timer to the queue
    Add {
        #[command(subcommand)]
        timer: TimerSpec,
    },
    /// Print the queue
    List {
        /// Print the full state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a timer by id
    Remove { id: u64 },
    /// Move the timer at FROM to position TO (0-based)
    Reorder { from: usize, to: usize },
    /// Overwrite one timer's remaining seconds
    Update { id: u64, remaining: u64 },
    /// Drop the whole queue
    Clear,
}

#[derive(Serialize)]
struct QueueRow<'a> {
    index: usize,
    id: u64,
    kind: &'a str,
    duration: String,
    remaining: String,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

fn row(index: usize, timer: &Timer, cursor: usize) -> QueueRow<'_> {
    QueueRow {
        index,
        id: timer.id,
        kind: timer.config.kind(),
        duration: format_time(timer.duration()),
        remaining: format_time(timer.remaining_time),
        active: index == cursor,
        description: timer.config.description(),
    }
}

pub fn run(action: QueueAction, config: &Config) -> CliResult {
    let mut controller = open_controller(config)?;

    match action {
        QueueAction::Add { timer } => {
            let timer_config = timer.into_config(&config.defaults);
            let events = controller.add_timer(timer_config);
            print_json(&events)?;
        }
        QueueAction::List { json } => {
            let state = controller.state();
            if json {
                print_json(state)?;
            } else {
                let rows: Vec<QueueRow> = state
                    .timers
                    .iter()
                    .enumerate()
                    .map(|(i, t)| row(i, t, state.current_timer_index))
                    .collect();
                print_json(&rows)?;
                eprintln!(
                    "{} timer(s), total {}",
                    state.timers.len(),
                    format_time(state.total_workout_time)
                );
            }
        }
        QueueAction::Remove { id } => {
            let events = controller.remove_timer(id);
            if events.is_empty() {
                return Err(format!("no timer with id {id}").into());
            }
            print_json(&events)?;
        }
        QueueAction::Reorder { from, to } => {
            let events = controller.reorder(from, to);
            if events.is_empty() {
                return Err(format!("no timer at index {from}").into());
            }
            print_json(&events)?;
        }
        QueueAction::Update { id, remaining } => {
            let events = controller.update_timer(id, remaining);
            if events.is_empty() {
                return Err(format!("no timer with id {id}").into());
            }
            print_json(&events)?;
        }
        QueueAction::Clear => {
            controller.clear()?;
            println!("{{\"type\": \"queue_cleared\"}}");
        }
    }
    Ok(())
}
