//! [`LocalHost`]: hosted repositories as bare repos on the local disk.
//!
//! `owner/name` maps to `<root>/owner/name.git`. Creation and deletion are
//! recorded so tests can assert on what the engine asked the host to do.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use ght_git::{Error, GitCli, HostingClient, Invoker, Result};

/// Hosting backend that keeps every remote as a bare repository under `root`.
#[derive(Debug)]
pub struct LocalHost {
    root: PathBuf,
    git: GitCli,
    fail_create: Mutex<HashSet<String>>,
    fail_create_once: Mutex<HashSet<String>>,
    panic_on_create: Mutex<HashSet<String>>,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl LocalHost {
    /// Host rooted at `root`, which is created if missing.
    ///
    /// # Panics
    /// Panics if `root` cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .unwrap_or_else(|e| panic!("LocalHost: failed to create {}: {e}", root.display()));
        Self {
            root,
            git: GitCli::default(),
            fail_create: Mutex::new(HashSet::new()),
            fail_create_once: Mutex::new(HashSet::new()),
            panic_on_create: Mutex::new(HashSet::new()),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Version-control wrapper used for `init --bare` and `remote add`.
    pub fn with_git(mut self, git: GitCli) -> Self {
        self.git = git;
        self
    }

    /// Make every `create` for `remote_id` fail.
    pub fn fail_create_for(&self, remote_id: &str) {
        lock(&self.fail_create).insert(remote_id.to_string());
    }

    /// Make only the next `create` for `remote_id` fail.
    pub fn fail_create_once(&self, remote_id: &str) {
        lock(&self.fail_create_once).insert(remote_id.to_string());
    }

    /// Panic inside `create` for `remote_id`.
    pub fn panic_on_create(&self, remote_id: &str) {
        lock(&self.panic_on_create).insert(remote_id.to_string());
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the bare repository backing `remote_id`.
    pub fn bare_path(&self, remote_id: &str) -> PathBuf {
        self.root.join(format!("{remote_id}.git"))
    }

    /// Whether `remote_id` currently exists on this host.
    pub fn exists(&self, remote_id: &str) -> bool {
        self.bare_path(remote_id).is_dir()
    }

    /// Remote ids successfully created, in order.
    pub fn created(&self) -> Vec<String> {
        lock(&self.created).clone()
    }

    /// Remote ids successfully deleted, in order.
    pub fn deleted(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn refused(action: &str, remote_id: &str, reason: &str) -> Error {
    Error::CommandFailed {
        command: format!("local-host {action} {remote_id}"),
        code: Some(1),
        stderr: reason.to_string(),
    }
}

#[async_trait]
impl HostingClient for LocalHost {
    fn name(&self) -> &str {
        "local"
    }

    async fn delete(&self, _invoker: &Invoker, remote_id: &str, _cwd: Option<&Path>) -> Result<()> {
        let bare = self.bare_path(remote_id);
        if !bare.is_dir() {
            return Err(refused("delete", remote_id, "repository not found"));
        }
        tokio::fs::remove_dir_all(&bare)
            .await
            .map_err(|e| Error::Fs(ght_fs::Error::io(&bare, e)))?;
        lock(&self.deleted).push(remote_id.to_string());
        Ok(())
    }

    async fn create(&self, invoker: &Invoker, dir: &Path, remote_id: &str) -> Result<()> {
        if lock(&self.panic_on_create).contains(remote_id) {
            panic!("LocalHost: create panicked for {remote_id}");
        }
        let fail_now = lock(&self.fail_create_once).remove(remote_id);
        if fail_now || lock(&self.fail_create).contains(remote_id) {
            return Err(refused("create", remote_id, "name already exists on this account"));
        }
        let bare = self.bare_path(remote_id);
        if bare.exists() {
            return Err(refused("create", remote_id, "name already exists on this account"));
        }

        self.git.init_bare(invoker, &bare, &self.root).await?;
        self.git
            .add_origin(invoker, dir, &bare.to_string_lossy())
            .await?;
        lock(&self.created).push(remote_id.to_string());
        Ok(())
    }
}
