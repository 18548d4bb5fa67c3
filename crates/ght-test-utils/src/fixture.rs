//! [`Fixture`]: one temp dir with a host, a workspace path and credentials.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::host::LocalHost;

/// Username written to the fixture credential file.
pub const TEST_USER: &str = "jychri";

/// Commit identity for fixture commits, so tests don't depend on global git config.
pub const TEST_NAME: &str = "Test User";
pub const TEST_EMAIL: &str = "test@test.com";

/// Credential file content in the hosting tool's format.
pub fn credential_content(user: &str) -> String {
    format!("github.com:\n- user: {user}\n  oauth_token: 0123456789abcdef\n  protocol: https\n")
}

/// A temporary directory laid out as
///
/// ```text
/// <tmp>/host/        bare repositories served by LocalHost
/// <tmp>/work/        workspace root (not created; acquire does that)
/// <tmp>/hub          credential file
/// ```
pub struct Fixture {
    temp_dir: TempDir,
    host: Arc<LocalHost>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// # Panics
    /// Panics if the temp dir or credential file cannot be created.
    pub fn new() -> Self {
        let temp_dir =
            TempDir::new().unwrap_or_else(|e| panic!("Fixture: failed to create temp dir: {e}"));
        fs::write(temp_dir.path().join("hub"), credential_content(TEST_USER))
            .unwrap_or_else(|e| panic!("Fixture: failed to write credentials: {e}"));
        let host = Arc::new(LocalHost::new(temp_dir.path().join("host")));
        Self { temp_dir, host }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn host(&self) -> Arc<LocalHost> {
        Arc::clone(&self.host)
    }

    pub fn workspace(&self) -> PathBuf {
        self.path().join("work")
    }

    pub fn credential_path(&self) -> PathBuf {
        self.path().join("hub")
    }

    /// Replace the credential file content.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write_credentials(&self, content: &str) {
        fs::write(self.credential_path(), content)
            .unwrap_or_else(|e| panic!("Fixture: failed to write credentials: {e}"));
    }

    /// `owner/name` for the fixture user.
    pub fn remote_id(&self, name: &str) -> String {
        format!("{TEST_USER}/{name}")
    }

    /// Owned names for an orchestrator call.
    pub fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }
}
