//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ght - Provision disposable git repositories in known divergence states
#[derive(Parser, Debug)]
#[command(name = "ght")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "GHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hosting credential file (defaults to ~/.config/hub)
    #[arg(long, global = true, env = "GHT_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create repositories, drive them into their states, then clean up
    ///
    /// The state of each repository comes from its name: names containing
    /// Ahead, Behind, Dirty or Untracked get that divergence, anything else
    /// stays clean.
    ///
    /// Examples:
    ///   ght provision ~/fixtures Alpha ght-Ahead RepoBehind
    ///   ght provision ~/fixtures ght-Dirty --keep
    ///   ght provision /tmp/fx Alpha --json
    Provision {
        /// Workspace root; anything already there is removed
        root: PathBuf,

        /// Repository names
        names: Vec<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Leave repositories and remotes in place after the run
        #[arg(long)]
        keep: bool,

        /// Exit non-zero if any repository failed
        #[arg(long)]
        strict: bool,
    },

    /// Show what provision would create, without side effects
    Plan {
        /// Workspace root
        root: PathBuf,

        /// Repository names
        names: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
