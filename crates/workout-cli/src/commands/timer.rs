use clap::Subcommand;
use workout_core::{format_time, Config, IntervalTimer, TimerState, TimerStatus};

use super::clock::{run_clock, ClockExit};
use super::print_json;
use super::spec::TimerSpec;
use super::CliResult;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one timer live in the terminal
    Run {
        #[command(subcommand)]
        timer: TimerSpec,
    },
    /// Print the config and initial state of a timer without running it
    Preview {
        #[command(subcommand)]
        timer: TimerSpec,
    },
}

fn status_line(status: &TimerStatus) -> String {
    format!("{:<14} {}", status.label, format_time(status.display_secs))
}

pub fn run(action: TimerAction, config: &Config) -> CliResult {
    match action {
        TimerAction::Preview { timer } => {
            let timer_config = timer.into_config(&config.defaults);
            let engine = IntervalTimer::from_config(&timer_config);
            print_json(&serde_json::json!({
                "config": timer_config,
                "duration": format_time(timer_config.duration_secs()),
                "status": engine.status(),
            }))?;
        }
        TimerAction::Run { timer } => {
            let timer_config = timer.into_config(&config.defaults);
            let mut engine = IntervalTimer::from_config(&timer_config);
            engine.start();
            eprintln!("{}", status_line(&engine.status()));

            let exit = run_clock(config.workout.tick_interval_ms, || {
                if let Some(outcome) = engine.tick() {
                    if let Ok(line) = serde_json::to_string(&outcome) {
                        println!("{line}");
                    }
                }
                eprintln!("{}", status_line(&engine.status()));
                engine.state() != TimerState::Finished
            })?;

            if exit == ClockExit::Interrupted {
                engine.pause();
                eprintln!("stopped at {}", format_time(engine.display_secs()));
            }
            print_json(&engine.status())?;
        }
    }
    Ok(())
}
