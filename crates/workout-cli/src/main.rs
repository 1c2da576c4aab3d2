use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use workout_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "workout-cli", version, about = "Workout interval timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit the workout queue
    Queue {
        #[command(subcommand)]
        action: commands::queue::QueueAction,
    },
    /// Run and control the queued workout
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Run a single timer outside the queue
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Export or import shareable workout links
    Share {
        #[command(subcommand)]
        action: commands::share::ShareAction,
    },
    /// Finished workouts
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show how raw time or rounds text is normalized
    Normalize(commands::normalize::NormalizeArgs),
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load_or_default();

    let result = match cli.command {
        Commands::Queue { action } => commands::queue::run(action, &config),
        Commands::Workout { action } => commands::workout::run(action, &config),
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Share { action } => commands::share::run(action, &config),
        Commands::History { action } => commands::history::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Normalize(args) => commands::normalize::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "workout-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
