//! Shared test utilities for the ght workspace.
//!
//! Provides a hosting backend backed by local bare repositories, so the
//! provisioning engine can be exercised end to end without network access
//! or a hosting account. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`host`] — [`LocalHost`], a [`ght_git::HostingClient`] over bare repos
//! - [`fixture`] — [`Fixture`], a temp dir holding host, workspace and credentials
//! - [`git`] — `git2` helpers for assertions on provisioned repositories

pub mod fixture;
pub mod git;
pub mod host;

pub use fixture::Fixture;
pub use host::LocalHost;
