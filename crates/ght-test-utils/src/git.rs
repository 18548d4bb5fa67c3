//! `git2` helpers for asserting on provisioned repositories.

use std::path::Path;

use git2::Repository;

/// Open the repository at `path`.
///
/// # Panics
/// Panics if `path` is not a repository.
pub fn open(path: &Path) -> Repository {
    Repository::open(path)
        .unwrap_or_else(|e| panic!("open: {} is not a repository: {e}", path.display()))
}

/// Commit summaries reachable from HEAD, newest first.
///
/// # Panics
/// Panics if HEAD cannot be walked.
pub fn commit_messages(path: &Path) -> Vec<String> {
    let repo = open(path);
    let mut walk = repo
        .revwalk()
        .unwrap_or_else(|e| panic!("commit_messages: revwalk failed: {e}"));
    walk.push_head()
        .unwrap_or_else(|e| panic!("commit_messages: no HEAD in {}: {e}", path.display()));
    walk.map(|oid| {
        let oid = oid.unwrap_or_else(|e| panic!("commit_messages: {e}"));
        repo.find_commit(oid)
            .unwrap_or_else(|e| panic!("commit_messages: {e}"))
            .summary()
            .unwrap_or_default()
            .to_string()
    })
    .collect()
}

/// Commit id at the tip of `branch` in the (bare or non-bare) repo at `path`.
///
/// # Panics
/// Panics if the branch does not exist.
pub fn branch_tip(path: &Path, branch: &str) -> git2::Oid {
    let repo = open(path);
    repo.find_branch(branch, git2::BranchType::Local)
        .unwrap_or_else(|e| panic!("branch_tip: no branch {branch} in {}: {e}", path.display()))
        .get()
        .peel_to_commit()
        .unwrap_or_else(|e| panic!("branch_tip: {e}"))
        .id()
}

/// Commit id HEAD points to.
///
/// # Panics
/// Panics if HEAD does not resolve to a commit.
pub fn head(path: &Path) -> git2::Oid {
    open(path)
        .head()
        .and_then(|h| h.peel_to_commit())
        .map(|c| c.id())
        .unwrap_or_else(|e| panic!("head: {e}"))
}
