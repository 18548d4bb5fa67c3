//! Version-control and hosting plumbing for ght
//!
//! Every mutating operation shells out to an external tool (`git` for
//! version control, `hub` for hosting management) through an [`Invoker`],
//! which bounds each call with a timeout and aborts it when the run is
//! cancelled. Read-only inspection of the resulting repositories goes
//! through `git2` in [`inspect`].

pub mod error;
pub mod hosting;
pub mod inspect;
pub mod invoker;
pub mod vcs;

pub use error::{Error, Result};
pub use hosting::{HostingClient, HubCli};
pub use inspect::WorktreeStatus;
pub use invoker::{CommandOutput, Invoker};
pub use vcs::{CommitIdentity, GitCli};
