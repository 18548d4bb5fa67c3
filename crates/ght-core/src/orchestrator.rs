//! Run-level state machine
//!
//! ```text
//! Init -> CredentialResolved -> WorkspaceAcquired -> Provisioned -> StateApplied -> Released
//! ```
//!
//! Fatal errors (bad names, credential, workspace directory) happen before
//! any model work and leave nothing behind. From `WorkspaceAcquired` on,
//! every failure is per-model and release always runs.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use ght_git::{HostingClient, Invoker};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ProvisionConfig;
use crate::context::ProvisionContext;
use crate::credential::{Credential, CredentialResolver};
use crate::driver::StateDriver;
use crate::error::{Error, Phase, Result, Step, StepCause, StepError};
use crate::model::{ModelRegistry, RepoModel};
use crate::provisioner::RepoProvisioner;
use crate::report::{ModelOutcome, Report, Verdict};
use crate::workspace::RunWorkspace;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    CredentialResolved,
    WorkspaceAcquired,
    Provisioned,
    StateApplied,
    Released(Verdict),
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::CredentialResolved => write!(f, "credential_resolved"),
            Self::WorkspaceAcquired => write!(f, "workspace_acquired"),
            Self::Provisioned => write!(f, "provisioned"),
            Self::StateApplied => write!(f, "state_applied"),
            Self::Released(Verdict::Success) => write!(f, "released(success)"),
            Self::Released(Verdict::PartialFailure) => write!(f, "released(partial_failure)"),
        }
    }
}

fn enter(state: RunState) -> RunState {
    info!(%state, "Run state");
    state
}

/// Drives a whole run: credential, workspace, both phases, release.
pub struct Orchestrator {
    config: ProvisionConfig,
    resolver: Option<CredentialResolver>,
    host: Arc<dyn HostingClient>,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Orchestrator using the configured `hub` executable as hosting backend.
    pub fn new(config: ProvisionConfig) -> Self {
        let host = Arc::new(config.hub_cli());
        Self {
            config,
            resolver: None,
            host,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: CredentialResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_host(mut self, host: Arc<dyn HostingClient>) -> Self {
        self.host = host;
        self
    }

    /// Use `cancel` as the run-scoped cancellation signal.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn resolver(&self) -> Result<CredentialResolver> {
        if let Some(resolver) = &self.resolver {
            return Ok(resolver.clone());
        }
        match &self.config.credential_path {
            Some(path) => {
                let path = ght_fs::expand_tilde(path).map_err(crate::ConfigError::Settings)?;
                Ok(CredentialResolver::at(path.to_native()))
            }
            None => Ok(CredentialResolver::hub_default()?),
        }
    }

    fn resolve_credential(&self) -> Result<Credential> {
        Ok(self.resolver()?.resolve()?)
    }

    /// Models a run over `names` would provision, without touching disk or host.
    pub fn plan(&self, root: impl AsRef<Path>, names: &[String]) -> Result<Vec<RepoModel>> {
        validate_names(names)?;
        let credential = self.resolve_credential()?;
        let root = ght_fs::resolve_root(root)?;
        Ok(ModelRegistry::expand(&credential, &root, names))
    }

    /// Provision `names` under `root`, drive each into its target state,
    /// then release everything the run created.
    ///
    /// Returns `Err` only for fatal errors, all of which happen before the
    /// workspace is touched. Per-model failures are in the report.
    pub async fn run(&self, root: impl AsRef<Path>, names: &[String]) -> Result<Report> {
        let started_at = Utc::now();
        enter(RunState::Init);

        validate_names(names)?;
        let credential = self.resolve_credential()?;
        enter(RunState::CredentialResolved);

        let workspace = RunWorkspace::acquire(root)?;
        enter(RunState::WorkspaceAcquired);

        let models = ModelRegistry::expand(&credential, workspace.root(), names);
        let ctx = Arc::new(ProvisionContext::new(
            &self.config,
            Arc::clone(&self.host),
            self.cancel.clone(),
            workspace.ledger().clone(),
        ));

        let provisioned = provision_phase(&ctx, &models).await;
        enter(RunState::Provisioned);

        let outcomes = state_phase(&ctx, models, provisioned).await;
        enter(RunState::StateApplied);

        let cleanup = if self.config.keep_workspace {
            workspace.keep()
        } else {
            let invoker = Invoker::uncancellable(self.config.release_timeout());
            workspace.release(self.host.as_ref(), &invoker).await
        };

        let report = Report {
            root: workspace.root().clone(),
            started_at,
            finished_at: Utc::now(),
            cancelled: self.cancel.is_cancelled(),
            outcomes,
            cleanup,
        };
        enter(RunState::Released(report.verdict()));
        if report.cancelled {
            warn!("Run was cancelled");
        }
        Ok(report)
    }

    /// [`run`](Self::run) on a dedicated multi-threaded runtime.
    pub fn run_blocking(&self, root: impl AsRef<Path>, names: &[String]) -> Result<Report> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        runtime.block_on(self.run(root, names))
    }
}

/// Provision `names` under `root` with default settings and `hub`.
pub fn provision(root: impl AsRef<Path>, names: &[String]) -> Result<Report> {
    Orchestrator::new(ProvisionConfig::default()).run_blocking(root, names)
}

/// Reject names that cannot map to a unique working copy and remote.
pub fn validate_names(names: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if let Err(e) = ght_fs::validate_path_identifier(name) {
            let reason = match e {
                ght_fs::Error::InvalidIdentifier { reason, .. } => reason,
                other => other.to_string(),
            };
            return Err(Error::InvalidName {
                name: name.clone(),
                reason,
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(Error::InvalidName {
                name: name.clone(),
                reason: "requested more than once".to_string(),
            });
        }
    }
    Ok(())
}

async fn provision_phase(
    ctx: &Arc<ProvisionContext>,
    models: &[RepoModel],
) -> Vec<std::result::Result<(), StepError>> {
    let handles: Vec<_> = models
        .iter()
        .cloned()
        .map(|model| {
            let ctx = Arc::clone(ctx);
            tokio::spawn(async move { RepoProvisioner::new(&ctx).provision(&model).await })
        })
        .collect();

    let mut results = Vec::with_capacity(models.len());
    for (model, handle) in models.iter().zip(handles) {
        results.push(settle(model, Phase::Provision, handle).await);
    }
    results
}

async fn state_phase(
    ctx: &Arc<ProvisionContext>,
    models: Vec<RepoModel>,
    provisioned: Vec<std::result::Result<(), StepError>>,
) -> Vec<ModelOutcome> {
    let handles: Vec<Option<JoinHandle<_>>> = models
        .iter()
        .zip(&provisioned)
        .map(|(model, result)| {
            result.is_ok().then(|| {
                let ctx = Arc::clone(ctx);
                let model = model.clone();
                tokio::spawn(async move { StateDriver::new(&ctx).apply(&model).await })
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(models.len());
    for ((model, result), handle) in models.into_iter().zip(provisioned).zip(handles) {
        let outcome = match (result, handle) {
            (Err(error), _) => ModelOutcome {
                model,
                phase: Phase::Provision,
                error: Some(error),
            },
            (Ok(()), Some(handle)) => {
                let error = settle(&model, Phase::State, handle).await.err();
                ModelOutcome {
                    model,
                    phase: Phase::State,
                    error,
                }
            }
            (Ok(()), None) => ModelOutcome {
                model,
                phase: Phase::State,
                error: None,
            },
        };
        outcomes.push(outcome);
    }
    outcomes
}

/// Wait for one model's task; a panic becomes that model's error.
async fn settle(
    model: &RepoModel,
    phase: Phase,
    handle: JoinHandle<std::result::Result<(), StepError>>,
) -> std::result::Result<(), StepError> {
    match handle.await {
        Ok(result) => result,
        Err(join) => {
            warn!(model = %model.name, %phase, error = %join, "Task did not complete");
            Err(StepError::new(
                &model.name,
                phase,
                Step::Task,
                StepCause::Panicked {
                    message: join.to_string(),
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_accepts_fixture_names() {
        assert!(validate_names(&names(&["Alpha", "RepoBehind", "ght-Dirty"])).is_ok());
        assert!(validate_names(&[]).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let err = validate_names(&names(&["Alpha", "Beta", "Alpha"])).unwrap_err();
        assert!(matches!(err, Error::InvalidName { ref name, .. } if name == "Alpha"));
    }

    #[test]
    fn test_validate_rejects_aux_prefix_and_separators() {
        assert!(matches!(
            validate_names(&names(&["_Behind"])),
            Err(Error::InvalidName { .. })
        ));
        assert!(matches!(
            validate_names(&names(&["a/b"])),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn test_run_state_display() {
        assert_eq!(
            RunState::Released(Verdict::PartialFailure).to_string(),
            "released(partial_failure)"
        );
    }
}
