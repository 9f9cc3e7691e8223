//! Scenario Builder - assessment scenario authoring
//!
//! This is the main entry point for the scenario-builder binary.
//! Each invocation loads the scenario file, applies one command and
//! writes the result back.

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod panel;
mod persona;
mod scenario;
mod storage;
mod types;
mod version;

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::commands::{Context, DialogEdits};
use crate::config::BuilderConfig;
use crate::error::Result;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e.format_for_log(), "Command failed");
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // For commands that don't need full logging, use simple setup
    match cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { ref subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone(), cli.config.as_deref());
        }
        _ => {}
    }

    let config = BuilderConfig::load(cli.config.as_deref())?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let scenario_path = cli
        .scenario
        .as_deref()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .unwrap_or_else(|| config.scenario_path());
    debug!(path = %scenario_path.display(), "Using scenario file");

    let ctx = Context {
        config,
        scenario_path,
        json: cli.json,
    };

    match cli.command {
        Commands::Init { name, force } => commands::init(&ctx, name, force),
        Commands::Show => commands::show(&ctx),
        Commands::Activity { subcommand } => commands::activity(&ctx, subcommand),
        Commands::Persona { subcommand } => commands::persona(&ctx, subcommand),
        Commands::Dependency { subcommand } => commands::dependency(&ctx, subcommand),
        Commands::Dialog {
            activity,
            toggle,
            conversation,
            starter,
            messages,
        } => commands::dialog(
            &ctx,
            activity,
            DialogEdits {
                toggle,
                conversation,
                starter,
                messages,
            },
        ),
        Commands::Field { subcommand } => commands::field(&ctx, subcommand),
        Commands::Inbox { subcommand } => commands::inbox(&ctx, subcommand),
        Commands::Nav { subcommand } => commands::nav(&ctx, subcommand),
        Commands::Version | Commands::Config { .. } => {
            // Already handled above
            unreachable!()
        }
    }
}

fn handle_config_command(subcommand: ConfigSubcommand, config_path: Option<&str>) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = BuilderConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", written.display());
        }
        ConfigSubcommand::Validate => {
            BuilderConfig::load(config_path)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
