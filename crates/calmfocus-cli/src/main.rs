use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "calmfocus", version, about = "Calm Focus CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Milestone management and progress
    Milestone {
        #[command(subcommand)]
        action: commands::milestone::MilestoneAction,
    },
    /// Unlocked achievements, newest first
    Achievements,
    /// Scheduled reminders
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Timer preferences and daily goal
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Milestone { action } => commands::milestone::run(action),
        Commands::Achievements => commands::achievements::run(),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Prefs { action } => commands::prefs::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
