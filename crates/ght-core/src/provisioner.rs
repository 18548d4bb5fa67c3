//! Baseline provisioning of a single model
//!
//! Brings a model from nothing to a clean repository whose one commit is
//! published to a freshly created remote. Steps run strictly in order and
//! the first failure ends the model's provisioning.

use ght_fs::io;
use tracing::{debug, info, warn};

use crate::context::{ProvisionContext, blocking};
use crate::error::{Phase, Step, StepCause, StepError};
use crate::model::RepoModel;

/// Creation attempts for a remote (the first try plus one retry).
pub const REMOTE_CREATE_ATTEMPTS: u32 = 2;

const PHASE: Phase = Phase::Provision;

/// Provisions one model against the shared context.
pub struct RepoProvisioner<'a> {
    ctx: &'a ProvisionContext,
}

impl<'a> RepoProvisioner<'a> {
    pub fn new(ctx: &'a ProvisionContext) -> Self {
        Self { ctx }
    }

    /// Run every baseline step for `model`.
    pub async fn provision(&self, model: &RepoModel) -> Result<(), StepError> {
        let ctx = self.ctx;
        let dir = model.local_path.to_native();

        let local = model.local_path.clone();
        ctx.step(model, PHASE, Step::RecreateDir, blocking(move || io::recreate_dir(&local)))
            .await?;

        ctx.step(model, PHASE, Step::InitRepo, ctx.git.init(&ctx.invoker, &dir)).await?;

        self.ensure_remote(model).await?;

        let seed = model.seed_path();
        let text = ctx.config.seed_text.clone();
        ctx.step(model, PHASE, Step::WriteSeed, blocking(move || io::write_text(&seed, &text)))
            .await?;

        ctx.step(model, PHASE, Step::Stage, ctx.git.add_all(&ctx.invoker, &dir)).await?;

        ctx.step(
            model,
            PHASE,
            Step::Commit,
            ctx.git
                .commit(&ctx.invoker, &dir, &ctx.config.initial_commit_message),
        )
        .await?;

        ctx.step(model, PHASE, Step::Publish, ctx.git.push(&ctx.invoker, &dir)).await?;

        info!(model = %model.name, remote = %model.remote_id, "Provisioned baseline");
        Ok(())
    }

    /// Delete any previous remote with the same id and create it fresh.
    ///
    /// The id goes into the ledger before the first attempt so release can
    /// still clean it up if a later step fails. Deletion failures are
    /// tolerated; creation gets one retry.
    async fn ensure_remote(&self, model: &RepoModel) -> Result<(), StepError> {
        let ctx = self.ctx;
        let dir = model.local_path.to_native();
        ctx.ledger.record(&model.remote_id);

        let mut last_error = String::new();
        for attempt in 1..=REMOTE_CREATE_ATTEMPTS {
            match ctx.host.delete(&ctx.invoker, &model.remote_id, Some(&dir)).await {
                Ok(()) => {
                    debug!(model = %model.name, remote = %model.remote_id, "Deleted old remote");
                }
                Err(ght_git::Error::Cancelled { .. }) => {
                    let cause = StepCause::Cancelled;
                    return Err(StepError::new(&model.name, PHASE, Step::DeleteRemote, cause));
                }
                Err(e) => debug!(model = %model.name, error = %e, "No previous remote to delete"),
            }

            match ctx.host.create(&ctx.invoker, &dir, &model.remote_id).await {
                Ok(()) => {
                    debug!(model = %model.name, attempt, "Created remote");
                    return Ok(());
                }
                Err(e @ ght_git::Error::Cancelled { .. }) => {
                    return Err(StepError::new(&model.name, PHASE, Step::CreateRemote, e));
                }
                Err(e) => {
                    warn!(
                        model = %model.name,
                        remote = %model.remote_id,
                        attempt,
                        error = %e,
                        "Remote creation failed"
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(StepError::new(
            &model.name,
            PHASE,
            Step::CreateRemote,
            StepCause::RemoteConflict {
                remote_id: model.remote_id.clone(),
                attempts: REMOTE_CREATE_ATTEMPTS,
                last: last_error,
            },
        ))
    }
}
