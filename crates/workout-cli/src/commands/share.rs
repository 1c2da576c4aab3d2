use clap::Subcommand;
use workout_core::Config;

use super::{open_controller, print_json, CliResult};

#[derive(Subcommand)]
pub enum ShareAction {
    /// Print a link that reproduces the current queue
    Export {
        /// Base URL to attach the workout to (defaults to share.base_url)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Replace the queue with the timers from a shared link
    Import {
        /// Full URL, query string, or encoded workout value
        link: String,
    },
}

pub fn run(action: ShareAction, config: &Config) -> CliResult {
    let mut controller = open_controller(config)?;

    match action {
        ShareAction::Export { base_url } => {
            let base = base_url.as_deref().unwrap_or(&config.share.base_url);
            println!("{}", controller.share_link(base)?);
        }
        ShareAction::Import { link } => {
            // Validate first so a bad link is reported instead of silently ignored.
            workout_core::storage::share::decode_link(&link)?;
            let events = controller.import_link(&link);
            print_json(&events)?;
        }
    }
    Ok(())
}
