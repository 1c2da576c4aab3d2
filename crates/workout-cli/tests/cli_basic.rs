//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(dir: &TempDir, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_workout-cli"))
        .args(args)
        .env("WORKOUT_TIMER_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(dir: &TempDir, args: &[&str]) -> Value {
    let (code, stdout, stderr) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

#[test]
fn test_normalize_time_field() {
    let dir = TempDir::new().unwrap();
    let out = run_json(&dir, &["normalize", "-5x"]);
    assert_eq!(out["text"], "05");
    assert_eq!(out["value"], 5);
}

#[test]
fn test_normalize_rounds_field() {
    let dir = TempDir::new().unwrap();
    let out = run_json(&dir, &["normalize", "--rounds", "abc"]);
    assert_eq!(out["text"], "");
    assert_eq!(out["value"], 1);
}

#[test]
fn test_queue_add_and_list() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["queue", "add", "countdown", "-m", "0", "-s", "30"]);
    run_json(&dir, &["queue", "add", "xy", "-m", "0", "-s", "10", "-r", "3"]);

    let state = run_json(&dir, &["queue", "list", "--json"]);
    let timers = state["timers"].as_array().unwrap();
    assert_eq!(timers.len(), 2);
    assert_eq!(timers[0]["type"], "Countdown");
    assert_eq!(timers[1]["remainingTime"], 30);
    assert_eq!(state["totalWorkoutTime"], 60);
}

#[test]
fn test_workout_tick_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["queue", "add", "countdown", "-m", "0", "-s", "5"]);
    run_json(&dir, &["queue", "add", "countdown", "-m", "0", "-s", "5"]);
    run_json(&dir, &["workout", "start"]);

    let (code, stdout, _) = run_cli(&dir, &["workout", "tick", "7"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("TimerAdvanced"));

    let status = run_json(&dir, &["workout", "status"]);
    assert_eq!(status["timer_index"], 1);
    assert_eq!(status["active_remaining_secs"], 3);
    assert_eq!(status["running"], true);
}

#[test]
fn test_run_exits_when_active_timer_was_removed() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["queue", "add", "countdown", "-m", "0", "-s", "5"]);
    run_json(&dir, &["queue", "add", "countdown", "-m", "0", "-s", "5"]);
    run_json(&dir, &["workout", "next"]);
    run_json(&dir, &["queue", "remove", "1"]);

    let (code, stdout, _) = run_cli(&dir, &["workout", "run"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("WorkoutCompleted"));

    let status = run_json(&dir, &["workout", "status"]);
    assert_eq!(status["complete"], true);
    assert_eq!(status["running"], false);
}

#[test]
fn test_remove_unknown_timer_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["queue", "remove", "42"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no timer with id 42"));
}

#[test]
fn test_share_roundtrip_between_data_dirs() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    run_json(
        &source,
        &[
            "queue", "add", "tabata", "--work-minutes", "0", "--work-seconds", "20",
            "--rest-minutes", "0", "--rest-seconds", "10", "-r", "8",
        ],
    );

    let (code, link, _) = run_cli(&source, &["share", "export"]);
    assert_eq!(code, 0);
    let link = link.trim();
    assert!(link.contains("workout="));

    run_json(&target, &["share", "import", link]);
    let state = run_json(&target, &["queue", "list", "--json"]);
    assert_eq!(state["timers"][0]["type"], "Tabata");
    assert_eq!(state["totalWorkoutTime"], 240);
}

#[test]
fn test_config_get_and_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["config", "get", "workout.tick_interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1000");

    let (code, _, _) = run_cli(&dir, &["config", "set", "defaults.xy_rounds", "4"]);
    assert_eq!(code, 0);
    run_json(&dir, &["queue", "add", "xy", "-m", "0", "-s", "10"]);
    let state = run_json(&dir, &["queue", "list", "--json"]);
    assert_eq!(state["timers"][0]["rounds"], 4);
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("workout-cli"));
}
