//! Error types for ght-core
//!
//! [`Error`] is the fatal taxonomy: any of these stops the run before model
//! work begins. Per-model failures are [`StepError`] values that end up in
//! the report instead of unwinding the run.

use std::fmt;
use std::path::PathBuf;

use ght_git::error::describe_exit_code;
use serde::Serialize;

/// Result type for ght-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credential source missing or malformed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Workspace root could not be created or removed
    #[error("Workspace directory error at {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: ght_fs::Error,
    },

    /// A requested repository name cannot be provisioned
    #[error("Invalid repository name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The async runtime could not be started
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Filesystem error from ght-fs
    #[error(transparent)]
    Fs(#[from] ght_fs::Error),

    /// Git error from ght-git
    #[error(transparent)]
    Git(#[from] ght_git::Error),
}

/// Problems with the hosting credential source or run settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unable to open credentials: {0}")]
    Unreadable(#[source] ght_fs::Error),

    #[error("No user in {path}")]
    MissingUser { path: PathBuf },

    #[error("No OAuth token value in {path}")]
    MissingToken { path: PathBuf },

    #[error("Home directory could not be determined")]
    NoHomeDir,

    #[error("Invalid settings: {0}")]
    Settings(#[source] ght_fs::Error),
}

/// Phase of a run in which a model outcome was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Provision,
    State,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provision => write!(f, "provision"),
            Self::State => write!(f, "state"),
        }
    }
}

/// One step of a model's provisioning or state transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    RecreateDir,
    InitRepo,
    DeleteRemote,
    CreateRemote,
    WriteSeed,
    Stage,
    Commit,
    Publish,
    CloneAux,
    EditFile,
    Verify,
    /// The task itself failed (panic or abort)
    Task,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecreateDir => "recreate_dir",
            Self::InitRepo => "init_repo",
            Self::DeleteRemote => "delete_remote",
            Self::CreateRemote => "create_remote",
            Self::WriteSeed => "write_seed",
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::Publish => "publish",
            Self::CloneAux => "clone_aux",
            Self::EditFile => "edit_file",
            Self::Verify => "verify",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a step failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepCause {
    #[error("`{command}` failed (exit code {}): {stderr}", describe_exit_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {secs}s")]
    TimedOut { command: String, secs: u64 },

    #[error("cancelled")]
    Cancelled,

    #[error("remote {remote_id} could not be created after {attempts} attempts: {last}")]
    RemoteConflict {
        remote_id: String,
        attempts: u32,
        last: String,
    },

    #[error("filesystem: {message}")]
    Filesystem { message: String },

    #[error("inspection: {message}")]
    Inspection { message: String },

    #[error("state check failed: {message}")]
    Verification { message: String },

    #[error("task panicked: {message}")]
    Panicked { message: String },
}

impl From<ght_git::Error> for StepCause {
    fn from(err: ght_git::Error) -> Self {
        use ght_git::Error as G;
        match err {
            G::CommandFailed {
                command,
                code,
                stderr,
            } => Self::CommandFailed {
                command,
                code,
                stderr,
            },
            G::Spawn { command, source } => Self::CommandFailed {
                command,
                code: None,
                stderr: source.to_string(),
            },
            G::Timeout { command, timeout } => Self::TimedOut {
                command,
                secs: timeout.as_secs(),
            },
            G::Cancelled { .. } => Self::Cancelled,
            G::Fs(e) => Self::Filesystem {
                message: e.to_string(),
            },
            other => Self::Inspection {
                message: other.to_string(),
            },
        }
    }
}

impl From<ght_fs::Error> for StepCause {
    fn from(err: ght_fs::Error) -> Self {
        Self::Filesystem {
            message: err.to_string(),
        }
    }
}

/// A failed step, scoped to one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{model}: {phase} step '{step}' failed: {cause}")]
pub struct StepError {
    pub model: String,
    pub phase: Phase,
    pub step: Step,
    pub cause: StepCause,
}

impl StepError {
    pub fn new(
        model: impl Into<String>,
        phase: Phase,
        step: Step,
        cause: impl Into<StepCause>,
    ) -> Self {
        Self {
            model: model.into(),
            phase,
            step,
            cause: cause.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cause == StepCause::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_maps_to_timed_out() {
        let cause = StepCause::from(ght_git::Error::Timeout {
            command: "git push -u origin master".into(),
            timeout: Duration::from_secs(120),
        });
        assert_eq!(
            cause,
            StepCause::TimedOut {
                command: "git push -u origin master".into(),
                secs: 120
            }
        );
    }

    #[test]
    fn test_step_error_display_names_model_and_step() {
        let err = StepError::new(
            "Alpha",
            Phase::Provision,
            Step::CreateRemote,
            StepCause::RemoteConflict {
                remote_id: "jychri/Alpha".into(),
                attempts: 2,
                last: "name already exists".into(),
            },
        );
        let display = err.to_string();
        assert!(display.starts_with("Alpha: provision step 'create_remote' failed"));
        assert!(display.contains("jychri/Alpha"));
    }

    #[test]
    fn test_command_failed_display_without_exit_code() {
        let cause = StepCause::CommandFailed {
            command: "git init".into(),
            code: None,
            stderr: "killed".into(),
        };
        assert_eq!(cause.to_string(), "`git init` failed (exit code none): killed");
    }
}
