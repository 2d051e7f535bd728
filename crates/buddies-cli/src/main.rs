mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::voter::VoterSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "buddies",
    about = "Track voter progress and keep friends nudging each other along",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: auto-detect from .buddies/ or .git/)
    #[arg(long, global = true, env = "BUDDIES_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the .buddies/ data directory
    Init,

    /// Manage voters and friendships
    Voter {
        #[command(subcommand)]
        subcommand: VoterSubcommand,
    },

    /// Refresh statuses from the provider and fan out activity
    UpdateStatuses,

    /// Top up neighbor recommendations
    UpdateNeighbors,

    /// Recompute profile staleness and alert flags
    UpdateProfiles,

    /// Send due digest emails
    SendEmails {
        /// Only send on this weekday (e.g. "monday"); overrides config
        #[arg(long, value_parser = cmd::send_emails::parse_weekday)]
        day: Option<chrono::Weekday>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Voter { subcommand } => cmd::voter::run(&root, subcommand, cli.json),
        Commands::UpdateStatuses => cmd::update_statuses::run(&root, cli.json),
        Commands::UpdateNeighbors => cmd::update_neighbors::run(&root, cli.json),
        Commands::UpdateProfiles => cmd::update_profiles::run(&root, cli.json),
        Commands::SendEmails { day } => cmd::send_emails::run(&root, day, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
