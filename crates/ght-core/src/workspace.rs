//! Run-scoped resources: the workspace directory and every remote created
//!
//! [`RunWorkspace`] pairs the scoped workspace directory with a
//! [`RemoteLedger`] that provisioning tasks append to as soon as they start
//! creating a remote. Release deletes every ledger entry, then the
//! directory tree. Both halves are idempotent.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use ght_fs::{NormalizedPath, ScopedWorkspace};
use ght_git::{HostingClient, Invoker};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::report::CleanupSummary;

/// Remote ids this run may have created, in first-recorded order.
#[derive(Debug, Clone, Default)]
pub struct RemoteLedger {
    inner: Arc<Mutex<Vec<String>>>,
}

impl RemoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `remote_id` for deletion at release. Duplicates are ignored.
    pub fn record(&self, remote_id: &str) {
        let mut entries = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !entries.iter().any(|e| e == remote_id) {
            entries.push(remote_id.to_string());
        }
    }

    /// Current entries.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return every entry.
    fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Workspace directory plus remote ledger for one run.
#[derive(Debug)]
pub struct RunWorkspace {
    dir: ScopedWorkspace,
    ledger: RemoteLedger,
}

impl RunWorkspace {
    /// Wipe and recreate the workspace root.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dir = ScopedWorkspace::acquire(path).map_err(|source| Error::Directory {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir,
            ledger: RemoteLedger::new(),
        })
    }

    pub fn root(&self) -> &NormalizedPath {
        self.dir.root()
    }

    pub fn ledger(&self) -> &RemoteLedger {
        &self.ledger
    }

    /// Delete every recorded remote, then the directory tree.
    ///
    /// Failures are logged and summarized, never returned: by the time
    /// release runs the per-model verdicts are final. Calling this again
    /// only retries the directory removal.
    pub async fn release(&self, host: &dyn HostingClient, invoker: &Invoker) -> CleanupSummary {
        let mut summary = CleanupSummary::default();

        for remote_id in self.ledger.drain() {
            match host.delete(invoker, &remote_id, None).await {
                Ok(()) => {
                    info!(remote = %remote_id, "Deleted remote");
                    summary.remotes_deleted.push(remote_id);
                }
                Err(e) => {
                    warn!(remote = %remote_id, error = %e, "Failed to delete remote");
                    summary.remotes_failed.push(remote_id);
                }
            }
        }

        if let Err(e) = self.dir.release() {
            warn!(root = %self.root(), error = %e, "Failed to remove workspace");
            summary.directory_error = Some(e.to_string());
        }

        summary
    }

    /// Skip release and leave everything in place for inspection.
    pub fn keep(&self) -> CleanupSummary {
        self.dir.disarm();
        info!(root = %self.root(), remotes = self.ledger.snapshot().len(), "Keeping workspace");
        CleanupSummary {
            kept: true,
            remotes_kept: self.ledger.snapshot(),
            ..CleanupSummary::default()
        }
    }
}
