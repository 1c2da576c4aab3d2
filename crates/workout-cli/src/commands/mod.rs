use serde::Serialize;
use workout_core::{Config, Database, WorkoutController};

pub mod clock;
pub mod config;
pub mod history;
pub mod normalize;
pub mod queue;
pub mod share;
pub mod spec;
pub mod timer;
pub mod workout;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the persisted workout behind every queue/workout command.
pub fn open_controller(
    config: &Config,
) -> Result<WorkoutController<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let controller = WorkoutController::open(db).with_history(config.workout.record_history);
    tracing::debug!(
        timers = controller.state().timers.len(),
        running = controller.state().is_workout_running,
        "restored workout"
    );
    Ok(controller)
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
