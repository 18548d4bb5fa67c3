//! Hosting credential resolution
//!
//! Reads the hosting tool's line-oriented config file once per run. Only the
//! username is kept; the token itself is never stored, only its presence.

use std::path::{Path, PathBuf};

use ght_fs::{NormalizedPath, io};
use serde::Serialize;

use crate::error::ConfigError;

const USER_MARKER: &str = "- user:";
const TOKEN_MARKER: &str = "oauth_token:";

/// Resolved hosting identity. Immutable after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub username: String,
    pub has_token: bool,
}

impl Credential {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            has_token: true,
        }
    }
}

/// Reads and validates the credential file.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    path: PathBuf,
}

impl CredentialResolver {
    /// Resolver for the credential file at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolver for `~/.config/hub`.
    pub fn hub_default() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::at(home.join(".config").join("hub")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the credential file and validate it.
    pub fn resolve(&self) -> Result<Credential, ConfigError> {
        let content =
            io::read_text(&NormalizedPath::new(&self.path)).map_err(ConfigError::Unreadable)?;
        let credential = parse(&content, &self.path)?;
        tracing::debug!(user = %credential.username, "Resolved hosting credential");
        Ok(credential)
    }
}

/// Parse credential file content.
///
/// The first non-empty `- user:` value is the username. Any non-empty
/// `oauth_token:` value marks the token as present.
pub fn parse(content: &str, path: &Path) -> Result<Credential, ConfigError> {
    let mut username: Option<String> = None;
    let mut has_token = false;

    for line in content.lines() {
        if username.is_none()
            && let Some(value) = value_after(line, USER_MARKER)
        {
            username = Some(value.to_string());
        }
        if value_after(line, TOKEN_MARKER).is_some() {
            has_token = true;
        }
    }

    let username = username.ok_or_else(|| ConfigError::MissingUser {
        path: path.to_path_buf(),
    })?;
    if !has_token {
        return Err(ConfigError::MissingToken {
            path: path.to_path_buf(),
        });
    }

    Ok(Credential {
        username,
        has_token,
    })
}

/// Trimmed, unquoted text following `marker`, if non-empty.
fn value_after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let idx = line.find(marker)?;
    let value = line[idx + marker.len()..]
        .trim()
        .trim_matches(|c| c == '`' || c == '"' || c == '\'')
        .trim();
    (!value.is_empty()).then_some(value)
}
