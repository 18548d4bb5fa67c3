//! Scoped ownership of the workspace root directory
//!
//! The workspace root holds every model's working copy for one run. It is
//! wiped and recreated on acquire and removed on release. Release is
//! idempotent and also runs from `Drop` if the owner never called it.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{NormalizedPath, Result, io, resolve_root};

/// Exclusive handle on a freshly created, empty workspace directory.
#[derive(Debug)]
pub struct ScopedWorkspace {
    root: NormalizedPath,
    released: AtomicBool,
    armed: AtomicBool,
}

impl ScopedWorkspace {
    /// Remove anything at `path` and recreate it as an empty directory.
    ///
    /// A leading `~` is expanded to the home directory and a relative path
    /// is resolved against the current directory.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let root = resolve_root(path)?;
        io::recreate_dir(&root)?;
        tracing::info!(root = %root, "Acquired workspace");

        Ok(Self {
            root,
            released: AtomicBool::new(false),
            armed: AtomicBool::new(true),
        })
    }

    /// The workspace root path.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Recursively remove the workspace directory.
    ///
    /// Safe to call any number of times, including after the directory was
    /// removed by someone else.
    pub fn release(&self) -> Result<()> {
        let first = !self.released.swap(true, Ordering::SeqCst);
        io::remove_tree(&self.root)?;
        if first {
            tracing::info!(root = %self.root, "Released workspace");
        }
        Ok(())
    }

    /// Whether `release` has been called.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Leave the directory on disk when this handle is dropped.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

impl Drop for ScopedWorkspace {
    fn drop(&mut self) {
        if self.armed.load(Ordering::SeqCst)
            && !self.is_released()
            && let Err(e) = io::remove_tree(&self.root)
        {
            tracing::warn!(root = %self.root, error = %e, "Failed to remove workspace on drop");
        }
    }
}
