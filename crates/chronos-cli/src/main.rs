use clap::{Parser, Subcommand};
use chronos_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "chronos-cli", version, about = "Chronos fasting tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fasting session control
    Fast {
        #[command(subcommand)]
        action: commands::fast::FastAction,
    },
    /// Streaks, totals and badges
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Milestones tagged passed / current / upcoming
    Timeline {
        /// Elapsed hours (defaults to the running session)
        #[arg(long)]
        hours: Option<f64>,
    },
    /// Phase, metabolic mode and organ states
    Phase {
        /// Elapsed hours (defaults to the running session)
        #[arg(long)]
        hours: Option<f64>,
    },
    /// Simulated biomarker curves
    Biomarkers {
        /// Seed for the insulin jitter
        #[arg(long)]
        seed: Option<u64>,
        /// Elapsed hours to mark as current (defaults to the running session)
        #[arg(long)]
        hours: Option<f64>,
    },
    /// Coaching insight for the current position
    Insight {
        /// Elapsed hours (defaults to the running session)
        #[arg(long)]
        hours: Option<f64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    chronos_core::logging::init(&config.logging);

    let result = match cli.command {
        Commands::Fast { action } => commands::fast::run(action, &config),
        Commands::Progress { action } => commands::progress::run(action, &config),
        Commands::Timeline { hours } => commands::view::timeline(hours, &config),
        Commands::Phase { hours } => commands::view::phase(hours, &config),
        Commands::Biomarkers { seed, hours } => commands::view::biomarkers(seed, hours, &config),
        Commands::Insight { hours } => commands::insight::run(hours, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
