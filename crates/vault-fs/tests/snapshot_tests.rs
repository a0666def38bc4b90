use vault_fs::{Blob, Category, Settings};
use vault_test_utils::TestVault;

#[test]
fn snapshot_root_after_init() {
    let vault = TestVault::initialized();
    let view = vault.entries("").join(",");

    insta::assert_snapshot!(view, @"data,index,keys,locks,snapshots");
}

#[test]
fn snapshot_first_and_last_shards() {
    let vault = TestVault::initialized();
    let shards = vault.entries("data");
    let view = format!("{}..{} ({})", shards[0], shards[shards.len() - 1], shards.len());

    insta::assert_snapshot!(view, @"00..ff (256)");
}

#[test]
fn snapshot_blob_listing_json() {
    let vault = TestVault::initialized();
    vault.repo().save_blob_bytes(Category::Index, "ab", b"abc").unwrap();
    vault.repo().save_blob_bytes(Category::Index, "cd", b"").unwrap();

    let blobs: Vec<Blob> = vault.repo().list_blobs(Category::Index).unwrap();
    let json = serde_json::to_string(&blobs).unwrap();

    insta::assert_snapshot!(json, @r###"[{"name":"ab","size":3},{"name":"cd","size":0}]"###);
}

#[test]
fn snapshot_default_settings_toml() {
    let settings = Settings::with_root("/srv/vault");
    let toml = toml::to_string(&settings).unwrap();
    let view = toml.trim_end().replace('\n', " | ");

    insta::assert_snapshot!(view, @r###"root = "/srv/vault" | dir_mode = "0700" | file_mode = "0600" | fsync = true"###);
}
