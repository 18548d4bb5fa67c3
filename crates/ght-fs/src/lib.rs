//! Filesystem helpers for ght fixture workspaces
//!
//! Provides normalized path handling, destructive directory helpers and the
//! scoped workspace directory that holds every provisioned working copy.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod workspace;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, expand_tilde, resolve_root, validate_path_identifier};
pub use workspace::ScopedWorkspace;
