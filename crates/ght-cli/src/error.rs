//! Error types for ght-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end the process with a non-zero status
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Fatal error from ght-core
    #[error(transparent)]
    Core(#[from] ght_core::Error),

    /// Settings file could not be loaded
    #[error(transparent)]
    Config(#[from] ght_core::ConfigError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Report could not be serialized
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },
}
