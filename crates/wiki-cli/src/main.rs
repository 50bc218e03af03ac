//! Wiki repository CLI
//!
//! Administrative access to a wiki repository: listing, reading and
//! writing files, rebuilding the file list cache and inspecting the
//! file name encoding.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(?cli, "Parsed command line");

    match &cli.command {
        Some(cmd) => execute_command(&cli, cmd),
        None => {
            println!("{} Wiki repository CLI", "wikirepo".green().bold());
            println!();
            println!("Run {} for available commands.", "wikirepo --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cli: &Cli, cmd: &Commands) -> Result<()> {
    // Codec commands do not need a repository
    let store = || context::open_store(cli);

    match cmd {
        Commands::List { json } => commands::run_list(&store()?, *json),
        Commands::Recent { count, pattern } => {
            commands::run_recent(&store()?, *count, pattern.as_deref())
        }
        Commands::Changed { since, json } => {
            commands::run_changed(&store()?, since.as_deref(), *json)
        }
        Commands::Cat { path } => commands::run_cat(&store()?, path),
        Commands::Put {
            path,
            from,
            shadow,
            timestamp,
        } => commands::run_put(
            &store()?,
            path,
            from.as_deref(),
            *shadow,
            timestamp.as_deref(),
        ),
        Commands::Rm { path, shadow } => commands::run_rm(&store()?, path, *shadow),
        Commands::Rebuild => commands::run_rebuild(&store()?),
        Commands::Encode { path } => commands::run_encode(path),
        Commands::Decode { physical } => commands::run_decode(physical),
    }
}
