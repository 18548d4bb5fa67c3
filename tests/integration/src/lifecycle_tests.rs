//! Workspace acquisition and release, local and remote halves together

use std::fs;
use std::time::Duration;

use ght_core::{Error, RunWorkspace};
use ght_git::{HostingClient, Invoker};
use ght_test_utils::Fixture;
use pretty_assertions::assert_eq;

fn invoker() -> Invoker {
    Invoker::uncancellable(Duration::from_secs(30))
}

#[test]
fn test_acquire_yields_empty_directory() {
    let fx = Fixture::new();
    let root = fx.workspace();
    fs::create_dir_all(root.join("Alpha/.git")).unwrap();
    fs::write(root.join("notes.md"), "left over").unwrap();

    let workspace = RunWorkspace::acquire(&root).unwrap();

    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    drop(workspace);
    assert!(!root.exists());
}

#[test]
fn test_acquire_over_a_file_replaces_it() {
    let fx = Fixture::new();
    let root = fx.workspace();
    fs::write(&root, "not a directory").unwrap();

    let _workspace = RunWorkspace::acquire(&root).unwrap();

    assert!(root.is_dir());
}

#[test]
fn test_acquire_failure_is_directory_error() {
    let fx = Fixture::new();
    fs::write(fx.path().join("blocker"), "file").unwrap();

    let err = RunWorkspace::acquire(fx.path().join("blocker/work")).unwrap_err();

    assert!(matches!(err, Error::Directory { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_release_twice_is_harmless() {
    let fx = Fixture::new();
    let host = fx.host();
    let workspace = RunWorkspace::acquire(fx.workspace()).unwrap();

    let remote = fx.remote_id("Alpha");
    let dir = fx.workspace().join("Alpha");
    fs::create_dir_all(&dir).unwrap();
    ght_git::GitCli::default().init(&invoker(), &dir).await.unwrap();
    host.create(&invoker(), &dir, &remote).await.unwrap();
    workspace.ledger().record(&remote);

    let first = workspace.release(host.as_ref(), &invoker()).await;
    let second = workspace.release(host.as_ref(), &invoker()).await;

    assert_eq!(first.remotes_deleted, vec![remote.clone()]);
    assert!(first.is_complete());
    assert!(second.remotes_deleted.is_empty());
    assert!(second.is_complete());
    assert!(!fx.workspace().exists());
    assert!(!host.exists(&remote));
    assert_eq!(host.deleted(), vec![remote]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_release_reports_remotes_it_could_not_delete() {
    let fx = Fixture::new();
    let workspace = RunWorkspace::acquire(fx.workspace()).unwrap();
    workspace.ledger().record(&fx.remote_id("Never-Created"));

    let summary = workspace.release(fx.host().as_ref(), &invoker()).await;

    assert_eq!(summary.remotes_failed, vec![fx.remote_id("Never-Created")]);
    assert!(!summary.is_complete());
    assert!(!fx.workspace().exists());
}

#[test]
fn test_keep_leaves_directory_in_place() {
    let fx = Fixture::new();
    let workspace = RunWorkspace::acquire(fx.workspace()).unwrap();
    workspace.ledger().record(&fx.remote_id("Alpha"));

    let summary = workspace.keep();
    drop(workspace);

    assert!(summary.kept);
    assert_eq!(summary.remotes_kept, vec![fx.remote_id("Alpha")]);
    assert!(fx.workspace().is_dir());
}
