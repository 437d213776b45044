//! JNLP launcher CLI
//!
//! Runs a Java Web Start application from its `.jnlp` manifest on a plain
//! Java runtime.

mod args;
mod cli;
mod error;
mod launcher;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::Cli;
use error::{CliError, Result};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{}", hint.yellow());
            }
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let settings = args::parse(&cli.tokens)?;

    let Some(manifest) = settings.manifest else {
        println!("{}", Cli::command().render_long_help());
        return Ok(0);
    };

    logging::init(cli.verbose || settings.config.debug)
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!(config = ?settings.config, "Effective configuration");

    launcher::run(&manifest, &settings.config)
}
