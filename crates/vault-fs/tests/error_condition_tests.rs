//! Tests for error handling under adverse filesystem conditions
//!
//! Everything except "not found" must reach the caller as an I/O error.

use vault_fs::{Category, Error};
use vault_test_utils::TestVault;

#[test]
fn check_blob_in_uninitialized_repo_is_not_found() {
    let vault = TestVault::new();
    let err = vault.repo().check_blob(Category::Data, "abcd").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_in_uninitialized_repo_succeeds() {
    let vault = TestVault::new();
    assert_eq!(vault.repo().delete_blob_sized(Category::Data, "abcd").unwrap(), 0);
}

#[test]
fn init_over_a_file_fails() {
    let vault = TestVault::new();
    std::fs::write(vault.root(), b"occupied").unwrap();

    let err = vault.repo().init(0o700).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn read_blob_that_is_a_directory_fails() {
    let vault = TestVault::initialized();
    // "ab" resolves to data/ab/ab; make that a directory
    std::fs::create_dir(vault.root().join("data").join("ab").join("ab")).unwrap();

    assert!(vault.repo().read_blob(Category::Data, "ab").is_err());
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn save_into_readonly_directory_preserves_original() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let vault = TestVault::initialized();
        vault.repo().save_blob_bytes(Category::Keys, "k1", b"original").unwrap();
        let keys = vault.root().join("keys");
        fs::set_permissions(&keys, Permissions::from_mode(0o555)).unwrap();

        let result = vault.repo().save_blob_bytes(Category::Keys, "k1", b"replacement");

        let _ = fs::set_permissions(&keys, Permissions::from_mode(0o700));
        let err = result.expect_err("write into read-only directory should fail");
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(vault.repo().read_blob(Category::Keys, "k1").unwrap(), b"original");
    }

    #[test]
    fn delete_in_readonly_directory_is_an_error_not_a_noop() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let vault = TestVault::initialized();
        vault.repo().save_blob_bytes(Category::Locks, "l1", b"lock").unwrap();
        let locks = vault.root().join("locks");
        fs::set_permissions(&locks, Permissions::from_mode(0o555)).unwrap();

        let result = vault.repo().delete_blob(Category::Locks, "l1");

        let _ = fs::set_permissions(&locks, Permissions::from_mode(0o700));
        assert!(matches!(result, Err(Error::Io { .. })));
        assert_eq!(vault.repo().check_blob(Category::Locks, "l1").unwrap(), 4);
    }

    #[test]
    fn list_unreadable_category_fails() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let vault = TestVault::initialized();
        let index = vault.root().join("index");
        fs::set_permissions(&index, Permissions::from_mode(0o000)).unwrap();

        let result = vault.repo().list_blobs(Category::Index);

        let _ = fs::set_permissions(&index, Permissions::from_mode(0o700));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn unreadable_config_is_not_reported_as_missing() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let vault = TestVault::initialized();
        vault.repo().save_config(b"secret").unwrap();
        let config = vault.root().join("config");
        fs::set_permissions(&config, Permissions::from_mode(0o000)).unwrap();

        let result = vault.repo().get_config();

        let _ = fs::set_permissions(&config, Permissions::from_mode(0o600));
        let err = result.unwrap_err();
        assert!(!err.is_not_found());
    }
}
