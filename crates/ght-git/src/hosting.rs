//! Hosting-management seam
//!
//! Remote repositories are created and deleted by an external tool. The
//! [`HostingClient`] trait is the seam between the provisioning engine and
//! that tool; [`HubCli`] drives the `hub` command line.

use std::path::Path;

use async_trait::async_trait;

use crate::{Invoker, Result};

/// Creates and deletes hosted repositories identified by `owner/name`.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Delete the hosted repository `remote_id`.
    ///
    /// Callers treat failure as "nothing to delete".
    async fn delete(&self, invoker: &Invoker, remote_id: &str, cwd: Option<&Path>) -> Result<()>;

    /// Create `remote_id` on the host and register it as `origin` of the
    /// working copy at `dir`.
    async fn create(&self, invoker: &Invoker, dir: &Path, remote_id: &str) -> Result<()>;
}

/// The `hub` command line as hosting backend.
#[derive(Debug, Clone)]
pub struct HubCli {
    program: String,
}

impl Default for HubCli {
    fn default() -> Self {
        Self::new("hub")
    }
}

impl HubCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn delete_args(remote_id: &str) -> Vec<String> {
        vec!["delete".into(), "-y".into(), remote_id.into()]
    }

    /// `hub create` names the repository after the working directory, which
    /// is always the model name.
    pub fn create_args() -> Vec<String> {
        vec!["create".into()]
    }
}

#[async_trait]
impl HostingClient for HubCli {
    fn name(&self) -> &str {
        &self.program
    }

    async fn delete(&self, invoker: &Invoker, remote_id: &str, cwd: Option<&Path>) -> Result<()> {
        invoker
            .run(&self.program, &Self::delete_args(remote_id), cwd)
            .await
            .map(|_| ())
    }

    async fn create(&self, invoker: &Invoker, dir: &Path, remote_id: &str) -> Result<()> {
        tracing::debug!(remote = %remote_id, dir = %dir.display(), "Creating hosted repository");
        invoker
            .run(&self.program, &Self::create_args(), Some(dir))
            .await
            .map(|_| ())
    }
}
