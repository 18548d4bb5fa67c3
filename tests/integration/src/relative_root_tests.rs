//! Runs given a workspace root relative to the current directory
//!
//! Kept in its own test binary: it changes the process working directory.

use std::env;

use ght_core::{CredentialResolver, IdentityConfig, Orchestrator, ProvisionConfig, Verdict};
use ght_fs::NormalizedPath;
use ght_test_utils::fixture::{TEST_EMAIL, TEST_NAME};
use ght_test_utils::{Fixture, git};
use pretty_assertions::assert_eq;

#[tokio::test(flavor = "multi_thread")]
async fn test_relative_root_keeps_clones_inside_workspace() {
    let fx = Fixture::new();
    env::set_current_dir(fx.path()).unwrap();

    let report = Orchestrator::new(ProvisionConfig {
        identity: Some(IdentityConfig {
            name: TEST_NAME.into(),
            email: TEST_EMAIL.into(),
        }),
        keep_workspace: true,
        ..ProvisionConfig::default()
    })
    .with_resolver(CredentialResolver::at(fx.credential_path()))
    .with_host(fx.host())
    .run("work", &Fixture::names(&["Alpha", "RepoBehind"]))
    .await
    .unwrap();

    assert_eq!(report.verdict(), Verdict::Success, "{:#?}", report.outcomes);
    assert_eq!(report.root.as_str(), NormalizedPath::new(fx.workspace()).as_str());
    for outcome in &report.outcomes {
        assert!(outcome.model.local_path.to_native().is_absolute());
    }

    let aux = fx.workspace().join("_RepoBehind");
    assert_eq!(git::commit_messages(&aux), vec!["Behind origin", "Initial commit"]);
    assert!(!fx.workspace().join("work").exists());
}
