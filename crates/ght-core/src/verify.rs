//! Post-transform state checks
//!
//! Confirms through `git2` that a working copy actually shows the
//! divergence its name asks for. Runs on a blocking thread.

use std::path::Path;

use ght_git::inspect;

use crate::error::StepCause;
use crate::model::RepoModel;
use crate::state::TargetState;

const REMOTE: &str = "origin";

fn inspection(err: ght_git::Error) -> StepCause {
    StepCause::Inspection {
        message: err.to_string(),
    }
}

fn mismatch(message: impl Into<String>) -> StepCause {
    StepCause::Verification {
        message: message.into(),
    }
}

/// Check that `model` is in its target state relative to `origin/<branch>`.
pub fn check(model: &RepoModel, branch: &str) -> Result<(), StepCause> {
    let local = model.local_path.to_native();
    let status = inspect::worktree_status(&local).map_err(inspection)?;
    let counts = inspect::ahead_behind(&local, REMOTE, branch).map_err(inspection)?;

    match model.target {
        TargetState::Clean => {
            expect_sync(counts)?;
            if !status.is_clean() {
                return Err(mismatch(format!("working tree not clean: {status:?}")));
            }
        }
        TargetState::Ahead => {
            let (ahead, behind) = counts;
            if ahead == 0 || behind != 0 {
                return Err(mismatch(format!(
                    "expected local ahead of {REMOTE}/{branch}, got ahead {ahead} behind {behind}"
                )));
            }
            if !status.is_clean() {
                return Err(mismatch(format!("working tree not clean: {status:?}")));
            }
        }
        TargetState::Behind => {
            expect_sync(counts)?;
            let aux = model
                .aux_path
                .as_ref()
                .ok_or_else(|| mismatch("no auxiliary clone"))?
                .to_native();
            check_remote_moved(&local, &aux, branch)?;
        }
        TargetState::Dirty => {
            expect_sync(counts)?;
            let seed = model.seed_file_name();
            if status.modified != [seed.clone()]
                || !status.untracked.is_empty()
                || !status.staged.is_empty()
            {
                return Err(mismatch(format!(
                    "expected only {seed} modified and unstaged, got {status:?}"
                )));
            }
        }
        TargetState::Untracked => {
            expect_sync(counts)?;
            if status.untracked.len() != 1
                || !status.modified.is_empty()
                || !status.staged.is_empty()
            {
                return Err(mismatch(format!(
                    "expected exactly one untracked file, got {status:?}"
                )));
            }
        }
    }

    tracing::debug!(model = %model.name, state = %model.target, "State verified");
    Ok(())
}

fn expect_sync((ahead, behind): (usize, usize)) -> Result<(), StepCause> {
    if ahead != 0 || behind != 0 {
        return Err(mismatch(format!(
            "expected local in sync with its tracking branch, got ahead {ahead} behind {behind}"
        )));
    }
    Ok(())
}

/// The auxiliary clone published a commit the working copy does not have.
fn check_remote_moved(local: &Path, aux: &Path, branch: &str) -> Result<(), StepCause> {
    let local_head = inspect::head_oid(local).map_err(inspection)?;
    let aux_head = inspect::head_oid(aux).map_err(inspection)?;
    if local_head == aux_head {
        return Err(mismatch("remote head did not move"));
    }
    if !inspect::is_descendant(aux, aux_head, local_head).map_err(inspection)? {
        return Err(mismatch("remote head does not descend from the local head"));
    }

    let (aux_ahead, _) = inspect::ahead_behind(aux, REMOTE, branch).map_err(inspection)?;
    if aux_ahead != 0 {
        return Err(mismatch("auxiliary clone has unpublished commits"));
    }
    Ok(())
}
