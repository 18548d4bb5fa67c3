//! Concurrent provisioning engine for diverged fixture repositories
//!
//! Given a resolved hosting credential, a workspace root and a list of
//! repository names, this crate creates one local/remote repository pair per
//! name and drives each into the divergence state encoded in its name:
//!
//! - **Clean**: local and remote in sync
//! - **Ahead**: local has commits the remote lacks
//! - **Behind**: remote has commits the local copy lacks
//! - **Dirty**: a tracked file is modified but not committed
//! - **Untracked**: a file exists outside version control
//!
//! # Architecture
//!
//! ```text
//!   CredentialResolver ──> ModelRegistry ──> [RepoProvisioner × N] ──barrier──>
//!                                            [StateDriver × N] ──barrier──> Report
//!                                   RunWorkspace (directory + remote ledger)
//!                                   released on every exit path
//! ```
//!
//! The [`Orchestrator`] owns the run. Each model is provisioned in its own
//! task; failures are recorded against that model and never abort siblings.
//!
//! # Example
//!
//! ```no_run
//! let names = vec!["Alpha".to_string(), "RepoBehind".to_string()];
//! let report = ght_core::provision("/tmp/fixtures", &names)?;
//! assert_eq!(report.outcomes.len(), 2);
//! # Ok::<(), ght_core::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod credential;
pub mod driver;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provisioner;
pub mod report;
pub mod state;
pub mod verify;
pub mod workspace;

pub use config::{IdentityConfig, ProvisionConfig};
pub use context::ProvisionContext;
pub use credential::{Credential, CredentialResolver};
pub use driver::StateDriver;
pub use error::{ConfigError, Error, Phase, Result, Step, StepCause, StepError};
pub use model::{ModelRegistry, RepoModel};
pub use orchestrator::{Orchestrator, RunState, provision};
pub use provisioner::RepoProvisioner;
pub use report::{CleanupSummary, ModelOutcome, Report, Verdict};
pub use state::TargetState;
pub use workspace::{RemoteLedger, RunWorkspace};
