//! One-tick-per-interval driver for live runs.
//!
//! A current-thread runtime is enough: each tick runs to completion before
//! the next one is awaited, and Ctrl-C is the only other input.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockExit {
    /// `on_tick` asked to stop.
    Finished,
    /// Interrupted with Ctrl-C.
    Interrupted,
}

/// Call `on_tick` every `interval_ms` until it returns `false` or the user
/// presses Ctrl-C. The first call happens one interval after start.
pub fn run_clock<F>(interval_ms: u64, mut on_tick: F) -> Result<ClockExit, std::io::Error>
where
    F: FnMut() -> bool,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => return Ok(ClockExit::Interrupted),
                _ = interval.tick() => {
                    if !on_tick() {
                        return Ok(ClockExit::Finished);
                    }
                }
            }
        }
    })
}
