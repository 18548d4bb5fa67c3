//! End-to-end provisioning against a LocalHost
//!
//! Each test runs the full engine: credential file, workspace, both phases,
//! release. Remotes are bare repositories under the fixture's temp dir, so
//! the shape of both sides can be asserted with git2.

use std::fs;

use ght_core::config::SEED_TEXT;
use ght_core::{
    Credential, CredentialResolver, IdentityConfig, ModelRegistry, Orchestrator, Phase,
    ProvisionConfig, ProvisionContext, RemoteLedger, RepoProvisioner, StateDriver, Step, StepCause,
    TargetState, Verdict,
};
use ght_fs::NormalizedPath;
use ght_git::inspect;
use ght_test_utils::fixture::{TEST_EMAIL, TEST_NAME, TEST_USER};
use ght_test_utils::{Fixture, git};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn config() -> ProvisionConfig {
    ProvisionConfig {
        identity: Some(IdentityConfig {
            name: TEST_NAME.into(),
            email: TEST_EMAIL.into(),
        }),
        command_timeout_secs: 60,
        release_timeout_secs: 30,
        ..ProvisionConfig::default()
    }
}

fn kept(fx: &Fixture) -> Orchestrator {
    Orchestrator::new(ProvisionConfig {
        keep_workspace: true,
        ..config()
    })
    .with_resolver(CredentialResolver::at(fx.credential_path()))
    .with_host(fx.host())
}

fn remote_repo(fx: &Fixture, name: &str) -> git2::Repository {
    git::open(&fx.host().bare_path(&fx.remote_id(name)))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alpha_and_behind_example() {
    let fx = Fixture::new();
    let names = Fixture::names(&["Alpha", "RepoBehind"]);

    let report = kept(&fx).run(fx.workspace(), &names).await.unwrap();
    assert_eq!(report.verdict(), Verdict::Success, "{:#?}", report.outcomes);

    // Alpha: one commit holding only the seed document, same as its remote.
    let alpha = fx.workspace().join("Alpha");
    assert_eq!(inspect::commit_count(&alpha).unwrap(), 1);
    assert_eq!(inspect::head_files(&alpha).unwrap(), vec!["Alpha.md"]);
    assert_eq!(fs::read_to_string(alpha.join("Alpha.md")).unwrap(), SEED_TEXT);
    let alpha_remote = remote_repo(&fx, "Alpha");
    assert_eq!(
        alpha_remote.head().unwrap().peel_to_commit().unwrap().id(),
        git::head(&alpha)
    );

    // RepoBehind: local still at the shared initial commit; the remote moved
    // on through the auxiliary clone.
    let behind = fx.workspace().join("RepoBehind");
    let local_head = git::head(&behind);
    assert_eq!(git::commit_messages(&behind), vec!["Initial commit"]);

    let behind_remote = remote_repo(&fx, "RepoBehind");
    let remote_head = behind_remote.head().unwrap().peel_to_commit().unwrap().id();
    assert_ne!(remote_head, local_head);
    assert!(behind_remote.graph_descendant_of(remote_head, local_head).unwrap());
    assert_eq!(git::head(&fx.workspace().join("_RepoBehind")), remote_head);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ahead_commit_is_never_published() {
    let fx = Fixture::new();

    let report = kept(&fx)
        .run(fx.workspace(), &Fixture::names(&["ght-Ahead"]))
        .await
        .unwrap();
    assert_eq!(report.verdict(), Verdict::Success, "{:#?}", report.outcomes);

    let ahead = fx.workspace().join("ght-Ahead");
    let local_head = git::head(&ahead);
    let remote = remote_repo(&fx, "ght-Ahead");
    let remote_head = remote.head().unwrap().peel_to_commit().unwrap().id();

    assert!(git::open(&ahead).graph_descendant_of(local_head, remote_head).unwrap());
    assert!(remote.find_commit(local_head).is_err(), "local commit leaked to the remote");
    assert!(inspect::worktree_status(&ahead).unwrap().is_clean());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dirty_and_untracked_leave_history_alone() {
    let fx = Fixture::new();

    let report = kept(&fx)
        .run(fx.workspace(), &Fixture::names(&["ght-Dirty", "ght-Untracked"]))
        .await
        .unwrap();
    assert_eq!(report.verdict(), Verdict::Success, "{:#?}", report.outcomes);

    for name in ["ght-Dirty", "ght-Untracked"] {
        let dir = fx.workspace().join(name);
        assert_eq!(inspect::commit_count(&dir).unwrap(), 1, "{name}");
        assert_eq!(inspect::ahead_behind(&dir, "origin", "master").unwrap(), (0, 0), "{name}");
    }

    let dirty = inspect::worktree_status(&fx.workspace().join("ght-Dirty")).unwrap();
    assert_eq!(dirty.modified, vec!["ght-Dirty.md"]);
    assert!(dirty.untracked.is_empty() && dirty.staged.is_empty());

    let untracked = inspect::worktree_status(&fx.workspace().join("ght-Untracked")).unwrap();
    assert_eq!(untracked.untracked.len(), 1);
    assert!(untracked.modified.is_empty() && untracked.staged.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_remote_failure_is_isolated() {
    let fx = Fixture::new();
    let names = Fixture::names(&[
        "Alpha",
        "Beta",
        "Gamma",
        "Delta-Ahead",
        "Epsilon-Behind",
        "Zeta-Dirty",
    ]);
    fx.host().fail_create_for(&fx.remote_id("Gamma"));

    let report = Orchestrator::new(config())
        .with_resolver(CredentialResolver::at(fx.credential_path()))
        .with_host(fx.host())
        .run(fx.workspace(), &names)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), names.len());
    let order: Vec<_> = report.outcomes.iter().map(|o| o.model.name.clone()).collect();
    assert_eq!(order, names);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].model.name, "Gamma");
    assert_eq!(failed[0].phase, Phase::Provision);
    let error = failed[0].error.as_ref().unwrap();
    assert_eq!(error.step, Step::CreateRemote);
    assert!(matches!(error.cause, StepCause::RemoteConflict { .. }));

    assert_eq!(report.succeeded().count(), names.len() - 1);
    assert!(!fx.workspace().exists());
    for name in &names {
        assert!(!fx.host().exists(&fx.remote_id(name)), "{name} left on host");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_report_serializes_for_scripting() {
    let fx = Fixture::new();
    fx.host().fail_create_for(&fx.remote_id("Beta"));

    let report = Orchestrator::new(config())
        .with_resolver(CredentialResolver::at(fx.credential_path()))
        .with_host(fx.host())
        .run(fx.workspace(), &Fixture::names(&["Alpha", "Beta"]))
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["outcomes"][0]["error"], serde_json::Value::Null);
    assert_eq!(json["outcomes"][1]["error"]["step"], "create_remote");
    assert_eq!(json["outcomes"][1]["error"]["cause"]["kind"], "remote_conflict");
    assert_eq!(json["outcomes"][1]["model"]["target"], "clean");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_provisioner_and_driver_on_their_own() {
    let fx = Fixture::new();
    let root = NormalizedPath::new(fx.workspace());
    fs::create_dir_all(root.to_native()).unwrap();
    let models = ModelRegistry::expand(
        &Credential::new(TEST_USER),
        &root,
        &Fixture::names(&["Solo-Behind"]),
    );
    let model = &models[0];
    assert_eq!(model.target, TargetState::Behind);

    let ledger = RemoteLedger::new();
    let ctx = ProvisionContext::new(&config(), fx.host(), CancellationToken::new(), ledger.clone());

    RepoProvisioner::new(&ctx).provision(model).await.unwrap();
    assert_eq!(ledger.snapshot(), vec![fx.remote_id("Solo-Behind")]);
    assert_eq!(git::commit_messages(&model.local_path.to_native()), vec!["Initial commit"]);

    StateDriver::new(&ctx).apply(model).await.unwrap();
    let aux = model.aux_path.as_ref().unwrap().to_native();
    assert_eq!(git::commit_messages(&aux), vec!["Behind origin", "Initial commit"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_git_binary_fails_the_model_not_the_run() {
    let fx = Fixture::new();
    let settings = ProvisionConfig {
        git_program: "ght-no-such-git".into(),
        ..config()
    };

    let report = Orchestrator::new(settings)
        .with_resolver(CredentialResolver::at(fx.credential_path()))
        .with_host(fx.host())
        .run(fx.workspace(), &Fixture::names(&["Alpha"]))
        .await
        .unwrap();

    let error = report.outcomes[0].error.as_ref().unwrap();
    assert_eq!(error.step, Step::InitRepo);
    assert!(matches!(error.cause, StepCause::CommandFailed { code: None, .. }));
    assert!(fx.host().created().is_empty());
    assert!(!fx.workspace().exists());
}
