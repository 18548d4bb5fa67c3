//! Acquire/release behavior of the scoped workspace directory

use assert_fs::TempDir;
use assert_fs::prelude::*;
use ght_fs::ScopedWorkspace;
use predicates::prelude::*;
use std::fs;

fn entries(path: &std::path::Path) -> Vec<String> {
    fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_acquire_creates_missing_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("fixtures");

    let ws = ScopedWorkspace::acquire(root.path()).unwrap();

    root.assert(predicate::path::is_dir());
    assert!(entries(root.path()).is_empty());
    ws.release().unwrap();
}

#[test]
fn test_acquire_wipes_existing_content() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("fixtures");
    root.child("stale/nested/file.txt").write_str("old").unwrap();
    root.child("top.md").write_str("old").unwrap();

    let ws = ScopedWorkspace::acquire(root.path()).unwrap();

    assert!(entries(root.path()).is_empty());
    ws.release().unwrap();
}

#[test]
fn test_acquire_replaces_plain_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("fixtures");
    root.write_str("not a directory").unwrap();

    let ws = ScopedWorkspace::acquire(root.path()).unwrap();

    root.assert(predicate::path::is_dir());
    ws.release().unwrap();
}

#[test]
fn test_release_twice_is_harmless() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("fixtures");
    let ws = ScopedWorkspace::acquire(root.path()).unwrap();
    root.child("repo/README.md").write_str("x").unwrap();

    ws.release().unwrap();
    ws.release().unwrap();

    root.assert(predicate::path::missing());
    assert!(ws.is_released());
}

#[test]
fn test_release_after_external_removal() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("fixtures");
    let ws = ScopedWorkspace::acquire(root.path()).unwrap();

    fs::remove_dir_all(root.path()).unwrap();

    assert!(ws.release().is_ok());
}

#[test]
fn test_drop_removes_unreleased_workspace() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("fixtures");

    {
        let _ws = ScopedWorkspace::acquire(root.path()).unwrap();
        root.child("a/b.txt").write_str("x").unwrap();
    }

    root.assert(predicate::path::missing());
}

#[test]
fn test_disarmed_workspace_survives_drop() {
    let temp = TempDir::new().unwrap();
    let root = temp.child("fixtures");

    {
        let ws = ScopedWorkspace::acquire(root.path()).unwrap();
        ws.disarm();
    }

    root.assert(predicate::path::is_dir());
}
