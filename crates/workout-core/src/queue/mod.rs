mod action;
mod controller;
mod state;

pub use action::Action;
pub use controller::WorkoutController;
pub use state::{reduce, sum_remaining, PartialWorkoutState, Timer, WorkoutQueueState};
