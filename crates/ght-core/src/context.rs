//! Shared, read-only state handed to every per-model task

use std::future::Future;
use std::sync::Arc;

use ght_git::{GitCli, HostingClient, Invoker};
use tokio_util::sync::CancellationToken;

use crate::config::ProvisionConfig;
use crate::error::{Phase, Step, StepCause, StepError};
use crate::model::RepoModel;
use crate::workspace::RemoteLedger;

/// Tools and settings for provisioning and state tasks.
///
/// Shared behind an `Arc`; tasks only read it, except for appending to the
/// remote ledger.
pub struct ProvisionContext {
    pub config: ProvisionConfig,
    pub git: GitCli,
    pub host: Arc<dyn HostingClient>,
    pub invoker: Invoker,
    pub ledger: RemoteLedger,
}

impl ProvisionContext {
    pub fn new(
        config: &ProvisionConfig,
        host: Arc<dyn HostingClient>,
        cancel: CancellationToken,
        ledger: RemoteLedger,
    ) -> Self {
        Self {
            git: config.git_cli(),
            invoker: Invoker::new(config.command_timeout(), cancel),
            config: config.clone(),
            host,
            ledger,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.invoker.is_cancelled()
    }
}

impl ProvisionContext {
    /// Await one step of `model`, tagging any failure with the step.
    ///
    /// A cancelled run fails the step without starting it.
    pub(crate) async fn step<T, E>(
        &self,
        model: &RepoModel,
        phase: Phase,
        step: Step,
        fut: impl Future<Output = Result<T, E>>,
    ) -> Result<T, StepError>
    where
        E: Into<StepCause>,
    {
        if self.is_cancelled() {
            return Err(StepError::new(&model.name, phase, step, StepCause::Cancelled));
        }

        tracing::debug!(model = %model.name, %phase, %step, "Running step");
        fut.await.map_err(|e| {
            let err = StepError::new(&model.name, phase, step, e);
            tracing::warn!(model = %model.name, %phase, %step, error = %err.cause, "Step failed");
            err
        })
    }
}

/// Run blocking work (filesystem or `git2`) off the async workers.
pub(crate) async fn blocking<T, E, F>(f: F) -> Result<T, StepCause>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<StepCause> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(Into::into),
        Err(join) => Err(StepCause::Panicked {
            message: join.to_string(),
        }),
    }
}
