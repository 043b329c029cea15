//! plugdoc - regenerate plugin reference documentation from the marketplace catalog

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command, SyncArgs};
use plugdoc_sync::error::{exit_code, EXIT_USAGE};
use plugdoc_sync::Config;
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if let Err(e) = plugdoc_logging::init_logging(&config.logging.level, config.logging.json) {
        eprintln!("Warning: failed to initialize logging: {:#}", e);
    }
    debug!("Configuration: {:?}", config);

    let command = cli
        .command
        .unwrap_or_else(|| Command::Sync(SyncArgs::default()));

    match commands::run(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
