//! ght CLI
//!
//! Provisions disposable git repositories, each in the divergence state
//! named by its repository name, for testing tools that inspect many
//! repositories at once.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use ght_core::ProvisionConfig;

use cli::{Cli, Commands};
use error::Result;

/// Exit status when `--strict` is set and some repository failed.
const EXIT_PARTIAL_FAILURE: i32 = 2;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_PARTIAL_FAILURE),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.credentials {
        config.credential_path = Some(path);
    }

    match cli.command {
        Some(Commands::Provision {
            root,
            names,
            json,
            keep,
            strict,
        }) => {
            config.keep_workspace |= keep;
            commands::run_provision(config, &root, &names, json, strict)
        }
        Some(Commands::Plan { root, names, json }) => {
            commands::run_plan(config, &root, &names, json)?;
            Ok(true)
        }
        None => {
            println!("{} Diverged fixture repositories", "ght".green().bold());
            println!();
            println!("Run {} for available commands.", "ght --help".cyan());
            Ok(true)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ProvisionConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading settings");
            Ok(ProvisionConfig::load(path)?)
        }
        None => Ok(ProvisionConfig::default()),
    }
}
