//! [`TestVault`] builder for repository test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vault_fs::{Category, DiskFilesystem, Durability, Repository};

/// Directory mode used by fixtures.
pub const TEST_DIR_MODE: u32 = 0o700;

/// A temporary directory holding a repository at `<tmp>/repo`, plus helper
/// methods for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use vault_fs::Category;
/// use vault_test_utils::TestVault;
///
/// let vault = TestVault::initialized();
/// vault.repo().save_blob_bytes(Category::Keys, "k1", b"key").unwrap();
/// vault.assert_file_exists("keys/k1");
/// ```
pub struct TestVault {
    temp_dir: TempDir,
    repo: Repository,
}

impl Default for TestVault {
    fn default() -> Self {
        Self::new()
    }
}

impl TestVault {
    /// An empty temporary directory; the repository root does not exist yet.
    pub fn new() -> Self {
        Self::with_durability(Durability::detect())
    }

    /// Like [`TestVault::new`] with a custom flush policy.
    pub fn with_durability(durability: Durability) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let fs = DiskFilesystem::new().with_durability(durability);
        let repo = Repository::with_filesystem(temp_dir.path().join("repo"), fs);
        Self { temp_dir, repo }
    }

    /// A repository with its full directory skeleton.
    pub fn initialized() -> Self {
        let vault = Self::new();
        vault.init();
        vault
    }

    pub fn init(&self) {
        self.repo
            .init(TEST_DIR_MODE)
            .unwrap_or_else(|e| panic!("TestVault::init: {e}"));
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// The temporary directory containing the repository root.
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        self.repo.layout().root()
    }

    /// Save `count` small blobs with distinct hex identifiers.
    ///
    /// Returns the identifiers; blob `i` holds `i + 1` bytes.
    pub fn seed_blobs(&self, category: Category, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let id = format!("{:02x}{:062x}", (i * 37) % 256, i);
                let content = vec![b'x'; i + 1];
                self.repo
                    .save_blob_bytes(category, &id, &content)
                    .unwrap_or_else(|e| panic!("TestVault::seed_blobs: {e}"));
                id
            })
            .collect()
    }

    /// Sorted names of the entries directly under `rel` (relative to root).
    pub fn entries(&self, rel: &str) -> Vec<String> {
        let dir = self.root().join(rel);
        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap_or_else(|e| panic!("TestVault::entries: {}: {e}", dir.display()))
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn resolve(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn assert_file_exists(&self, rel: &str) {
        let path = self.resolve(rel);
        assert!(path.is_file(), "expected file at {}", path.display());
    }

    pub fn assert_dir_exists(&self, rel: &str) {
        let path = self.resolve(rel);
        assert!(path.is_dir(), "expected directory at {}", path.display());
    }

    pub fn assert_missing(&self, rel: &str) {
        let path = self.resolve(rel);
        assert!(!path.exists(), "expected nothing at {}", path.display());
    }
}
