//! Error types for ght-git

use std::path::PathBuf;
use std::time::Duration;

/// Result type for ght-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ght-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] ght_fs::Error),

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed (exit code {}): {stderr}", describe_exit_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {}s", .timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },

    #[error("`{command}` cancelled")]
    Cancelled { command: String },

    #[error("Remote '{name}' not found in {path}")]
    RemoteNotFound { name: String, path: PathBuf },

    #[error("Reference '{name}' not found in {path}")]
    ReferenceNotFound { name: String, path: PathBuf },
}

/// Exit code for messages; `none` when the process was killed by a signal
/// or never started.
pub fn describe_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}
