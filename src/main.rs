mod cli;
mod collectors;
mod config;
mod display;
mod error;
mod models;
mod renderer;
mod state;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relnote")]
#[command(about = "Manage changelog fragments and generate release notes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// State management commands
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Create a new changelog fragment
    New {
        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Comma-separated tags, e.g. "bug,orm"
        #[arg(long)]
        tags: String,

        /// Comma-separated ticket numbers
        #[arg(long)]
        tickets: Option<String>,

        /// Fragment file name (defaults to <first-ticket>.rst)
        #[arg(long)]
        name: Option<String>,
    },
    /// Lint all changelog fragments
    Check {
        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show unreleased fragments and commits since the last release
    Status {
        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Aggregate unreleased fragments into a release document
    Release {
        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Version to release, e.g. 1.4.2
        #[arg(long)]
        version: String,

        /// Release date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Dry run - print to stdout instead of writing and consuming fragments
        #[arg(long)]
        dry_run: bool,

        /// Keep fragment files after writing the release document
        #[arg(long)]
        keep: bool,
    },
    /// Show commands
    Show {
        #[command(subcommand)]
        command: ShowCommands,
    },
}

#[derive(Subcommand)]
enum ShowCommands {
    /// Display the most recent release document
    Latest {
        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Initialize relnote.toml configuration file
    Init {
        /// Path where to create the config file
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Reset state tracking (clears change markers and the release boundary)
    Reset {
        /// Path to the config file (defaults to relnote.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Init { path } => cli::config::init(path),
        },
        Commands::State { command } => match command {
            StateCommands::Reset { config } => cli::state::reset(config),
        },
        Commands::New {
            config,
            tags,
            tickets,
            name,
        } => cli::new::run(config, tags, tickets, name),
        Commands::Check { config } => cli::check::run(config),
        Commands::Status { config } => cli::status::run(config),
        Commands::Release {
            config,
            version,
            date,
            dry_run,
            keep,
        } => cli::release::run(config, version, date, dry_run, keep),
        Commands::Show { command } => match command {
            ShowCommands::Latest { config } => cli::show::latest(config),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
