//! Recovery after interrupted operations
//!
//! A crash can leave temporaries behind, a half-built skeleton, or an
//! operation the caller never saw acknowledged. Each case must be fixed by
//! simply retrying.

use std::fs;

use vault_fs::{Category, TEMP_PREFIX};
use vault_test_utils::TestVault;

const ID: &str = "c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00";

#[test]
fn test_leftover_temporary_is_invisible() {
    let vault = TestVault::initialized();
    let shard = vault.root().join("data").join("c0");
    fs::write(shard.join(format!("{TEMP_PREFIX}crashed")), b"partial").unwrap();

    assert!(vault.repo().list_blobs(Category::Data).unwrap().is_empty());

    vault.repo().save_blob_bytes(Category::Data, ID, b"complete").unwrap();
    let blobs = vault.repo().list_blobs(Category::Data).unwrap();
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].name, ID);
}

#[test]
fn test_retried_save_replaces_content() {
    let vault = TestVault::initialized();
    let repo = vault.repo();

    repo.save_blob_bytes(Category::Index, ID, b"attempt one").unwrap();
    repo.save_blob_bytes(Category::Index, ID, b"attempt two!").unwrap();

    assert_eq!(repo.read_blob(Category::Index, ID).unwrap(), b"attempt two!");
    assert_eq!(vault.entries("index"), vec![ID.to_string()]);
}

#[test]
fn test_half_built_skeleton_is_completed() {
    let vault = TestVault::new();
    fs::create_dir_all(vault.root().join("data").join("00")).unwrap();
    fs::create_dir_all(vault.root().join("keys")).unwrap();

    vault.init();

    assert_eq!(vault.entries("data").len(), 256);
    for dir in ["index", "locks", "snapshots"] {
        vault.assert_dir_exists(dir);
    }
}

#[test]
fn test_unacknowledged_delete_is_retried() {
    let vault = TestVault::initialized();
    let repo = vault.repo();
    repo.save_blob_bytes(Category::Locks, "lock-1", b"held").unwrap();

    assert_eq!(repo.delete_blob_sized(Category::Locks, "lock-1").unwrap(), 4);
    // Caller never saw the first result and tries again
    assert_eq!(repo.delete_blob_sized(Category::Locks, "lock-1").unwrap(), 0);
    vault.assert_missing("locks/lock-1");
}

#[test]
fn test_missing_shard_is_recreated_on_save() {
    let vault = TestVault::initialized();
    fs::remove_dir(vault.root().join("data").join("c0")).unwrap();

    assert!(vault.repo().list_blobs(Category::Data).unwrap().is_empty());
    vault.repo().save_blob_bytes(Category::Data, ID, b"pack").unwrap();

    vault.assert_file_exists(&format!("data/c0/{ID}"));
}
