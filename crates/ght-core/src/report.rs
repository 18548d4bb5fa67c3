//! Run results

use chrono::{DateTime, Utc};
use ght_fs::NormalizedPath;
use serde::Serialize;

use crate::error::{Phase, StepError};
use crate::model::RepoModel;

/// Final result for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOutcome {
    pub model: RepoModel,
    /// Phase in which the outcome was settled
    pub phase: Phase,
    /// First failing step, if any
    pub error: Option<StepError>,
}

impl ModelOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// What release did with the resources the run created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    pub remotes_deleted: Vec<String>,
    pub remotes_failed: Vec<String>,
    /// Remotes left in place because the workspace was kept
    pub remotes_kept: Vec<String>,
    pub directory_error: Option<String>,
    pub kept: bool,
}

impl CleanupSummary {
    /// Whether every resource was either removed or deliberately kept.
    pub fn is_complete(&self) -> bool {
        self.remotes_failed.is_empty() && self.directory_error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    PartialFailure,
}

/// Everything a run produced, one outcome per requested name in input order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub root: NormalizedPath,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cancelled: bool,
    pub outcomes: Vec<ModelOutcome>,
    pub cleanup: CleanupSummary,
}

impl Report {
    pub fn verdict(&self) -> Verdict {
        if self.outcomes.iter().all(ModelOutcome::succeeded) {
            Verdict::Success
        } else {
            Verdict::PartialFailure
        }
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ModelOutcome> {
        self.outcomes.iter().filter(|o| o.succeeded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ModelOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
