//! Read-only inspection of working copies through `git2`.
//!
//! Used to confirm that a repository actually reached the divergence state
//! it was driven towards. Nothing here mutates a repository.

use std::path::Path;

use git2::{Oid, Repository, Status, StatusOptions, TreeWalkMode, TreeWalkResult};

use crate::{Error, Result};

/// Working-tree changes relative to the index and HEAD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Tracked files modified in the working tree but not staged
    pub modified: Vec<String>,
    /// Files git does not track
    pub untracked: Vec<String>,
    /// Files with staged changes
    pub staged: Vec<String>,
}

impl WorktreeStatus {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.untracked.is_empty() && self.staged.is_empty()
    }
}

fn open(path: &Path) -> Result<Repository> {
    Ok(Repository::open(path)?)
}

/// Commit id HEAD points to.
pub fn head_oid(path: &Path) -> Result<Oid> {
    let repo = open(path)?;
    let head = repo.head()?;
    Ok(head.peel_to_commit()?.id())
}

/// Commit id of `refs/remotes/<remote>/<branch>`.
pub fn tracking_oid(path: &Path, remote: &str, branch: &str) -> Result<Oid> {
    let repo = open(path)?;
    let name = format!("refs/remotes/{remote}/{branch}");
    let reference = repo
        .find_reference(&name)
        .map_err(|_| Error::ReferenceNotFound {
            name: name.clone(),
            path: path.to_path_buf(),
        })?;
    Ok(reference.peel_to_commit()?.id())
}

/// How many commits HEAD is ahead of and behind the remote-tracking branch.
pub fn ahead_behind(path: &Path, remote: &str, branch: &str) -> Result<(usize, usize)> {
    let local = head_oid(path)?;
    let upstream = tracking_oid(path, remote, branch)?;
    let repo = open(path)?;
    Ok(repo.graph_ahead_behind(local, upstream)?)
}

/// Whether `descendant` strictly descends from `ancestor` in the repository at `path`.
pub fn is_descendant(path: &Path, descendant: Oid, ancestor: Oid) -> Result<bool> {
    let repo = open(path)?;
    Ok(repo.graph_descendant_of(descendant, ancestor)?)
}

/// URL configured for `remote`.
pub fn remote_url(path: &Path, remote: &str) -> Result<String> {
    let repo = open(path)?;
    let found = repo.find_remote(remote).map_err(|_| Error::RemoteNotFound {
        name: remote.to_string(),
        path: path.to_path_buf(),
    })?;
    found
        .url()
        .map(str::to_string)
        .ok_or_else(|| Error::RemoteNotFound {
            name: remote.to_string(),
            path: path.to_path_buf(),
        })
}

/// Number of commits reachable from HEAD.
pub fn commit_count(path: &Path) -> Result<usize> {
    let repo = open(path)?;
    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    let mut count = 0;
    for oid in revwalk {
        oid?;
        count += 1;
    }
    Ok(count)
}

/// Paths of all files in HEAD's tree, sorted.
pub fn head_files(path: &Path) -> Result<Vec<String>> {
    let repo = open(path)?;
    let tree = repo.head()?.peel_to_tree()?;
    let mut files = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(git2::ObjectType::Blob)
            && let Some(name) = entry.name()
        {
            files.push(format!("{root}{name}"));
        }
        TreeWalkResult::Ok
    })?;
    files.sort();
    Ok(files)
}

/// Classify every changed path in the working copy.
pub fn worktree_status(path: &Path) -> Result<WorktreeStatus> {
    let repo = open(path)?;
    let mut opts = StatusOptions::new();
    opts.include_untracked(true).recurse_untracked_dirs(true);

    let statuses = repo.statuses(Some(&mut opts))?;
    let mut status = WorktreeStatus::default();

    for entry in statuses.iter() {
        let Some(file) = entry.path() else { continue };
        let flags = entry.status();

        if flags.contains(Status::WT_NEW) {
            status.untracked.push(file.to_string());
        }
        if flags.intersects(Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_TYPECHANGE) {
            status.modified.push(file.to_string());
        }
        if flags.intersects(
            Status::INDEX_NEW
                | Status::INDEX_MODIFIED
                | Status::INDEX_DELETED
                | Status::INDEX_RENAMED
                | Status::INDEX_TYPECHANGE,
        ) {
            status.staged.push(file.to_string());
        }
    }

    status.modified.sort();
    status.untracked.sort();
    status.staged.sort();
    Ok(status)
}
