use clap::Subcommand;
use workout_core::{format_time, Config, Event, WorkoutQueueState};

use super::clock::{run_clock, ClockExit};
use super::{open_controller, print_json, CliResult};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Start or resume the workout
    Start,
    /// Pause the workout
    Pause,
    /// Flip between running and paused
    Toggle,
    /// Skip to the next timer
    Next,
    /// End the workout now
    End,
    /// Restore every timer and return to the first one
    Reset,
    /// Print current workout state as JSON
    Status,
    /// Advance the running workout by N seconds
    Tick {
        #[arg(default_value = "1")]
        count: u32,
    },
    /// Run the workout live, one tick per second, until it completes
    Run,
}

fn status_line(state: &WorkoutQueueState) -> String {
    match state.active_timer() {
        Some(timer) => format!(
            "[{}/{}] {:<9} {}  workout {}",
            state.current_timer_index + 1,
            state.timers.len(),
            timer.config.kind(),
            format_time(timer.remaining_time),
            format_time(state.remaining_workout_time()),
        ),
        None => format!("workout {}", format_time(state.remaining_workout_time())),
    }
}

fn print_events(events: &[Event]) -> CliResult {
    for event in events.iter().filter(|e| !e.is_snapshot()) {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

pub fn run(action: WorkoutAction, config: &Config) -> CliResult {
    let mut controller = open_controller(config)?;

    match action {
        WorkoutAction::Start => {
            if controller.state().is_workout_complete {
                return Err("workout is complete; reset it first".into());
            }
            if !controller.state().is_workout_running {
                controller.toggle();
            }
            print_json(&controller.state().snapshot())?;
        }
        WorkoutAction::Pause => {
            if controller.state().is_workout_running {
                controller.toggle();
            }
            print_json(&controller.state().snapshot())?;
        }
        WorkoutAction::Toggle => print_json(&controller.toggle())?,
        WorkoutAction::Next => print_json(&controller.next())?,
        WorkoutAction::End => print_json(&controller.end())?,
        WorkoutAction::Reset => print_json(&controller.reset())?,
        WorkoutAction::Status => print_json(&controller.state().snapshot())?,
        WorkoutAction::Tick { count } => {
            for _ in 0..count {
                print_events(&controller.tick())?;
            }
            print_json(&controller.state().snapshot())?;
        }
        WorkoutAction::Run => {
            if controller.state().timers.is_empty() {
                return Err("the queue is empty; add a timer first".into());
            }
            if controller.state().is_workout_complete {
                return Err("workout is complete; reset it first".into());
            }
            // The cursor can point past the end after its timer was removed.
            if controller.state().active_timer().is_none() {
                print_events(&controller.next())?;
                eprintln!("{}", status_line(controller.state()));
                return Ok(());
            }
            if !controller.state().is_workout_running {
                print_events(&controller.toggle())?;
            }
            eprintln!("{}", status_line(controller.state()));

            let mut failure = None;
            let exit = run_clock(config.workout.tick_interval_ms, || {
                let events = controller.tick();
                if let Err(e) = print_events(&events) {
                    failure = Some(e);
                    return false;
                }
                let state = controller.state();
                eprintln!("{}", status_line(state));
                !state.is_workout_complete && state.active_timer().is_some()
            })?;
            if let Some(e) = failure {
                return Err(e);
            }

            if exit == ClockExit::Interrupted && controller.state().is_workout_running {
                print_events(&controller.toggle())?;
                eprintln!("paused; resume with `workout-cli workout run`");
            }
        }
    }
    Ok(())
}
