//! Divergence transforms applied after the baseline
//!
//! Each transform touches only its own model's working copy (and, for
//! `Behind`, its auxiliary clone). When verification is enabled the result
//! is checked against the state's invariant before the task finishes.

use ght_fs::io;
use tracing::info;

use crate::context::{ProvisionContext, blocking};
use crate::error::{Phase, Step, StepCause, StepError};
use crate::model::RepoModel;
use crate::state::TargetState;
use crate::verify;

/// Message of the unpublished commit in an `Ahead` working copy.
pub const AHEAD_COMMIT_MESSAGE: &str = "Ahead of origin";
/// Message of the commit pushed from the auxiliary clone of a `Behind` model.
pub const BEHIND_COMMIT_MESSAGE: &str = "Behind origin";
/// File created in an `Untracked` working copy.
pub const UNTRACKED_FILE: &str = "untracked.md";

const PHASE: Phase = Phase::State;

/// Applies a model's target state on top of its baseline.
pub struct StateDriver<'a> {
    ctx: &'a ProvisionContext,
}

impl<'a> StateDriver<'a> {
    pub fn new(ctx: &'a ProvisionContext) -> Self {
        Self { ctx }
    }

    /// Run the transform for `model.target`, then verify it if enabled.
    pub async fn apply(&self, model: &RepoModel) -> Result<(), StepError> {
        let ctx = self.ctx;
        match model.target {
            TargetState::Clean => {}
            TargetState::Ahead => self.ahead(model).await?,
            TargetState::Behind => self.behind(model).await?,
            TargetState::Dirty => self.dirty(model).await?,
            TargetState::Untracked => self.untracked(model).await?,
        }

        if ctx.config.verify {
            let checked = model.clone();
            let remote_branch = ctx.config.branch.clone();
            ctx.step(
                model,
                PHASE,
                Step::Verify,
                blocking(move || verify::check(&checked, &remote_branch)),
            )
            .await?;
        }

        info!(model = %model.name, state = %model.target, "Applied state");
        Ok(())
    }

    /// Commit locally without publishing.
    async fn ahead(&self, model: &RepoModel) -> Result<(), StepError> {
        let ctx = self.ctx;
        let dir = model.local_path.to_native();

        let seed = model.seed_path();
        ctx.step(
            model,
            PHASE,
            Step::EditFile,
            blocking(move || io::append_text(&seed, "\n\nThis line exists only locally.\n")),
        )
        .await?;
        ctx.step(model, PHASE, Step::Stage, ctx.git.add_all(&ctx.invoker, &dir)).await?;
        ctx.step(
            model,
            PHASE,
            Step::Commit,
            ctx.git.commit(&ctx.invoker, &dir, AHEAD_COMMIT_MESSAGE),
        )
        .await
    }

    /// Publish a commit from an auxiliary clone so the remote moves on
    /// while the working copy stays where it is.
    async fn behind(&self, model: &RepoModel) -> Result<(), StepError> {
        let ctx = self.ctx;
        let aux = model.aux_path.clone().ok_or_else(|| {
            StepError::new(
                &model.name,
                PHASE,
                Step::CloneAux,
                StepCause::Filesystem {
                    message: "no auxiliary path allocated".to_string(),
                },
            )
        })?;
        let aux_dir = aux.to_native();
        let cwd = aux
            .parent()
            .map(|p| p.to_native())
            .unwrap_or_else(|| model.local_path.to_native());

        let local = model.local_path.to_native();
        let url = ctx.step(
            model,
            PHASE,
            Step::CloneAux,
            blocking(move || ght_git::inspect::remote_url(&local, "origin")),
        )
        .await?;

        let stale = aux.clone();
        ctx.step(model, PHASE, Step::CloneAux, blocking(move || io::remove_tree(&stale))).await?;
        ctx.step(
            model,
            PHASE,
            Step::CloneAux,
            ctx.git.clone_repo(&ctx.invoker, &url, &aux_dir, &cwd),
        )
        .await?;

        let seed = aux.join(&model.seed_file_name());
        ctx.step(
            model,
            PHASE,
            Step::EditFile,
            blocking(move || io::append_text(&seed, "\n\nThis line exists only on the remote.\n")),
        )
        .await?;
        ctx.step(model, PHASE, Step::Stage, ctx.git.add_all(&ctx.invoker, &aux_dir)).await?;
        ctx.step(
            model,
            PHASE,
            Step::Commit,
            ctx.git.commit(&ctx.invoker, &aux_dir, BEHIND_COMMIT_MESSAGE),
        )
        .await?;
        ctx.step(model, PHASE, Step::Publish, ctx.git.push(&ctx.invoker, &aux_dir)).await
    }

    /// Modify the tracked seed document and leave it unstaged.
    async fn dirty(&self, model: &RepoModel) -> Result<(), StepError> {
        let ctx = self.ctx;
        let seed = model.seed_path();
        ctx.step(
            model,
            PHASE,
            Step::EditFile,
            blocking(move || io::append_text(&seed, "\n\nUncommitted change.\n")),
        )
        .await
    }

    /// Create a file that is never staged.
    async fn untracked(&self, model: &RepoModel) -> Result<(), StepError> {
        let ctx = self.ctx;
        let path = model.local_path.join(UNTRACKED_FILE);
        ctx.step(
            model,
            PHASE,
            Step::EditFile,
            blocking(move || io::write_text(&path, "Not under version control.\n")),
        )
        .await
    }
}
