//! End-to-end flows across the backend crates
//!
//! Settings file -> repository -> blob and config lifecycle, plus callers
//! driving the blocking backend from an async runtime.

use std::collections::BTreeSet;
use std::sync::Arc;

use tempfile::TempDir;
use vault_fs::checksum::compute_id;
use vault_fs::{Blob, Category, Repository, Settings, SettingsStore};
use vault_test_utils::TestVault;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("vault_fs=debug")
        .try_init();
}

#[test]
fn test_settings_file_drives_repository() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let settings_path = temp.path().join("vault.yaml");
    let mut settings = Settings::with_root(temp.path().join("repo"));
    settings.fsync = false;

    let store = SettingsStore::new();
    store.save(&settings_path, &settings).unwrap();
    let loaded: Settings = store.load(&settings_path).unwrap();
    assert_eq!(loaded, settings);

    let repo = Repository::from_settings(&loaded);
    repo.init(loaded.dir_mode).unwrap();

    for category in Category::ALL {
        assert!(repo.layout().category_dir(category).is_dir());
    }
    assert!(!repo.filesystem().durability().is_enabled());
}

#[test]
fn test_content_addressed_lifecycle() {
    init_tracing();
    let vault = TestVault::initialized();
    let repo = vault.repo();

    let packs: Vec<&[u8]> = vec![b"first pack", b"second pack", b"third pack"];
    let mut ids = BTreeSet::new();
    for pack in &packs {
        let id = compute_id(pack);
        assert_eq!(repo.save_blob_bytes(Category::Data, &id, pack).unwrap(), pack.len() as u64);
        vault.assert_file_exists(&format!("data/{}/{}", &id[..2], id));
        ids.insert(id);
    }

    let listed: BTreeSet<String> = repo
        .list_blobs(Category::Data)
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(listed, ids);

    // Content can be verified against its identifier
    for id in &ids {
        let content = repo.read_blob(Category::Data, id).unwrap();
        assert_eq!(&compute_id(&content), id);
    }

    for id in &ids {
        repo.delete_blob(Category::Data, id).unwrap();
    }
    assert!(repo.list_blobs(Category::Data).unwrap().is_empty());
    vault.assert_dir_exists("data/00");
}

#[test]
fn test_config_and_blobs_do_not_interfere() {
    let vault = TestVault::initialized();
    let repo = vault.repo();

    repo.save_config(b"{\"version\":2}").unwrap();
    repo.save_blob_bytes(Category::Keys, "config", b"a key named config")
        .unwrap();

    assert_eq!(repo.get_config().unwrap(), b"{\"version\":2}");
    assert_eq!(
        repo.list_blobs(Category::Keys).unwrap(),
        vec![Blob::new("config", 18)]
    );

    repo.delete_config().unwrap();
    assert!(repo.check_config().unwrap_err().is_not_found());
    assert_eq!(repo.check_blob(Category::Keys, "config").unwrap(), 18);
}

#[test]
fn test_listing_serializes_for_callers() {
    let vault = TestVault::initialized();
    vault.repo().save_blob_bytes(Category::Snapshots, "s1", b"snap").unwrap();

    let blobs = vault.repo().list_blobs(Category::Snapshots).unwrap();
    let json = serde_json::to_value(&blobs).unwrap();

    assert_eq!(json, serde_json::json!([{ "name": "s1", "size": 4 }]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_callers_share_one_backend() {
    let vault = TestVault::initialized();
    let repo = Arc::new(vault.repo().clone());

    let mut handles = Vec::new();
    for i in 0..16u8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::task::spawn_blocking(move || -> vault_fs::Result<(String, u64)> {
            let content = vec![i; 64];
            let id = compute_id(&content);
            repo.save_blob_bytes(Category::Data, &id, &content)?;
            repo.check_blob(Category::Data, &id).map(|size| (id, size))
        }));
    }

    let mut ids = BTreeSet::new();
    for handle in handles {
        let (id, size) = handle.await.unwrap().unwrap();
        assert_eq!(size, 64);
        ids.insert(id);
    }
    assert_eq!(ids.len(), 16);

    let repo_for_list = Arc::clone(&repo);
    let listed = tokio::task::spawn_blocking(move || repo_for_list.list_blobs(Category::Data))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listed.len(), 16);
}
