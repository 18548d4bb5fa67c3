//! Run settings
//!
//! Every field has a default, so an empty settings file (or none at all)
//! reproduces the stock behavior: `git` and `hub` on `PATH`, branch
//! `master`, two-minute command timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ght_fs::{ConfigStore, NormalizedPath};
use ght_git::{CommitIdentity, GitCli, HubCli};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Placeholder text written to every seed document.
pub const SEED_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

/// Message of the baseline commit.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Commit identity override for fixture commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub name: String,
    pub email: String,
}

/// Settings for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    /// Version-control executable
    pub git_program: String,
    /// Hosting-management executable
    pub hosting_program: String,
    /// Branch created by init and published by push
    pub branch: String,
    /// Upper bound for each external command during provisioning
    pub command_timeout_secs: u64,
    /// Upper bound for each remote deletion during release
    pub release_timeout_secs: u64,
    pub seed_text: String,
    pub initial_commit_message: String,
    pub identity: Option<IdentityConfig>,
    /// Hosting credential file; `~/.config/hub` when unset
    pub credential_path: Option<PathBuf>,
    /// Check each model's resulting state after the transform
    pub verify: bool,
    /// Leave local directories and remotes in place after the run
    pub keep_workspace: bool,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            hosting_program: "hub".to_string(),
            branch: "master".to_string(),
            command_timeout_secs: 120,
            release_timeout_secs: 60,
            seed_text: SEED_TEXT.to_string(),
            initial_commit_message: INITIAL_COMMIT_MESSAGE.to_string(),
            identity: None,
            credential_path: None,
            verify: true,
            keep_workspace: false,
        }
    }
}

impl ProvisionConfig {
    /// Load settings from a TOML, JSON or YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = ght_fs::expand_tilde(path).map_err(ConfigError::Settings)?;
        ConfigStore::new()
            .load(&NormalizedPath::new(path))
            .map_err(ConfigError::Settings)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn release_timeout(&self) -> Duration {
        Duration::from_secs(self.release_timeout_secs)
    }

    /// Version-control wrapper configured from these settings.
    pub fn git_cli(&self) -> GitCli {
        GitCli::new(self.git_program.clone())
            .with_default_branch(self.branch.clone())
            .with_identity(self.identity.as_ref().map(|id| CommitIdentity {
                name: id.name.clone(),
                email: id.email.clone(),
            }))
    }

    /// Hosting backend configured from these settings.
    pub fn hub_cli(&self) -> HubCli {
        HubCli::new(self.hosting_program.clone())
    }
}
