//! Typed extensions CLI
//!
//! Discovers the bundled string-resolver extensions, applies stored
//! preferences and lets the user inspect, configure and run them.

mod catalog;
mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::Context;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        ext_registry::logging::init("debug")
            .map_err(|e| CliError::user(format!("Failed to set up logging: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} Typed extensions CLI", "ext".green().bold());
        println!();
        println!("Run {} for available commands.", "ext --help".cyan());
        return Ok(());
    };

    let preferences = cli
        .preferences
        .unwrap_or_else(context::default_preferences_path);
    let mut ctx = Context::load(&preferences)?;
    execute_command(&mut ctx, command)
}

fn execute_command(ctx: &mut Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List { doc_types, json } => commands::run_list(ctx, &doc_types, json),
        Commands::Show { key, json } => commands::run_show(ctx, &key, json),
        Commands::Default { doc_types, json } => commands::run_default(ctx, &doc_types, json),
        Commands::Set {
            key,
            assignments,
            json,
        } => commands::run_set(ctx, &key, &assignments, json),
        Commands::Reset { key, json } => commands::run_reset(ctx, &key, json),
        Commands::Resolve { key, element, json } => {
            commands::run_resolve(ctx, &key, &element, json)
        }
    }
}
