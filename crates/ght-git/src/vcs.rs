//! Version-control CLI wrapper
//!
//! Thin typed layer over `git` invocations. Every call prefixes the
//! subcommand with `-c` overrides so that fixture repositories are created
//! on a fixed default branch and commits never wait on signing prompts.

use std::path::Path;

use crate::{CommandOutput, Invoker, Result};

/// Author/committer identity passed to git on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// `git` invoked as an external process.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    default_branch: String,
    identity: Option<CommitIdentity>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            default_branch: "master".to_string(),
            identity: None,
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    pub fn with_identity(mut self, identity: Option<CommitIdentity>) -> Self {
        self.identity = identity;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Branch that `init` creates and `push` publishes.
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// Full argument list for a subcommand, including the `-c` overrides.
    pub fn args_for(&self, subcommand: &[&str]) -> Vec<String> {
        let mut args = vec![
            "-c".to_string(),
            format!("init.defaultBranch={}", self.default_branch),
            "-c".to_string(),
            "commit.gpgsign=false".to_string(),
        ];
        if let Some(identity) = &self.identity {
            args.push("-c".to_string());
            args.push(format!("user.name={}", identity.name));
            args.push("-c".to_string());
            args.push(format!("user.email={}", identity.email));
        }
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args
    }

    async fn run(
        &self,
        invoker: &Invoker,
        dir: &Path,
        subcommand: &[&str],
    ) -> Result<CommandOutput> {
        invoker
            .run(&self.program, &self.args_for(subcommand), Some(dir))
            .await
    }

    /// `git init`
    pub async fn init(&self, invoker: &Invoker, dir: &Path) -> Result<()> {
        self.run(invoker, dir, &["init"]).await.map(|_| ())
    }

    /// `git add --all`
    pub async fn add_all(&self, invoker: &Invoker, dir: &Path) -> Result<()> {
        self.run(invoker, dir, &["add", "--all"]).await.map(|_| ())
    }

    /// `git commit -m <message>`
    pub async fn commit(&self, invoker: &Invoker, dir: &Path, message: &str) -> Result<()> {
        self.run(invoker, dir, &["commit", "-m", message])
            .await
            .map(|_| ())
    }

    /// `git push -u origin <default branch>`
    pub async fn push(&self, invoker: &Invoker, dir: &Path) -> Result<()> {
        let branch = self.default_branch.clone();
        self.run(invoker, dir, &["push", "-u", "origin", &branch])
            .await
            .map(|_| ())
    }

    /// `git clone <url> <dest>`, run from `cwd`.
    pub async fn clone_repo(
        &self,
        invoker: &Invoker,
        url: &str,
        dest: &Path,
        cwd: &Path,
    ) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.run(invoker, cwd, &["clone", url, &dest])
            .await
            .map(|_| ())
    }

    /// `git init --bare <dest>`, used by local hosting backends.
    pub async fn init_bare(&self, invoker: &Invoker, dest: &Path, cwd: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.run(invoker, cwd, &["init", "--bare", &dest])
            .await
            .map(|_| ())
    }

    /// `git remote add origin <url>`
    pub async fn add_origin(&self, invoker: &Invoker, dir: &Path, url: &str) -> Result<()> {
        self.run(invoker, dir, &["remote", "add", "origin", url])
            .await
            .map(|_| ())
    }
}
