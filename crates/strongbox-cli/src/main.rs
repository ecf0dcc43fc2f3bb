//! Strongbox CLI - a zero-knowledge, CLI-first password vault
//!
//! This is the command-line interface for Strongbox. Records are encrypted
//! and decrypted locally by `strongbox-core`; only ciphertext, the salt
//! and the authentication hash are ever written to disk.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use strongbox_core::VERSION;

use crate::app::AppContext;
use crate::cli::Cli;
use crate::constants::LOG_ENV;
use crate::errors::{exit_code, CliError};

/// Install the stderr subscriber: STRONGBOX_LOG, then the config filter, then `warn`.
fn init_tracing(config_filter: Option<&str>) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config_filter.map(String::from))
        .unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli)?;
    init_tracing(ctx.config().logging.filter.as_deref());

    match &cli.command {
        Some(command) => commands::run(&ctx, command),
        None => {
            println!("Strongbox v{}", VERSION);
            println!("\nRun `strongbox --help` for usage information.");
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            cli_err.exit();
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}
