//! Keyed access to a repository
//!
//! [`Repository`] resolves (category, identifier) pairs through
//! [`RepoLayout`] and hands the resulting paths to a [`Filesystem`].

use std::io::Read;

use crate::constants::Category;
use crate::disk::DiskFilesystem;
use crate::filesystem::{Blob, Filesystem};
use crate::layout::RepoLayout;
use crate::settings::Settings;
use crate::{Error, Result};

/// A repository rooted at one directory, backed by a [`Filesystem`].
#[derive(Debug, Clone)]
pub struct Repository<F: Filesystem = DiskFilesystem> {
    layout: RepoLayout,
    fs: F,
}

impl Repository<DiskFilesystem> {
    /// Local-disk repository at `root` with default durability.
    pub fn open(root: impl Into<std::path::PathBuf>) -> Self {
        Self::with_filesystem(root, DiskFilesystem::new())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_filesystem(settings.root.clone(), DiskFilesystem::from_settings(settings))
    }
}

impl<F: Filesystem> Repository<F> {
    pub fn with_filesystem(root: impl Into<std::path::PathBuf>, fs: F) -> Self {
        Self {
            layout: RepoLayout::new(root),
            fs,
        }
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Create the directory skeleton. Safe to repeat.
    pub fn init(&self, mode: u32) -> Result<()> {
        self.fs.create_repo(self.layout.root(), mode)
    }

    pub fn get_config(&self) -> Result<Vec<u8>> {
        self.fs.get_config(&self.layout.config_path())
    }

    pub fn check_config(&self) -> Result<u64> {
        self.fs.check_config(&self.layout.config_path())
    }

    pub fn save_config(&self, content: &[u8]) -> Result<()> {
        self.fs.save_config(&self.layout.config_path(), content)
    }

    pub fn delete_config(&self) -> Result<()> {
        self.fs.delete_config(&self.layout.config_path())
    }

    /// All blobs of `category`, sorted by name.
    pub fn list_blobs(&self, category: Category) -> Result<Vec<Blob>> {
        self.fs
            .list_blobs(&self.layout.category_dir(category), category.is_sharded())
    }

    pub fn get_blob(&self, category: Category, id: &str) -> Result<Box<dyn Read + Send>> {
        self.fs.get_blob(&self.layout.blob_path(category, id))
    }

    /// Read a whole blob into memory.
    pub fn read_blob(&self, category: Category, id: &str) -> Result<Vec<u8>> {
        let path = self.layout.blob_path(category, id);
        let mut reader = self.fs.get_blob(&path)?;
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .map_err(|e| Error::io(&path, e))?;
        Ok(content)
    }

    pub fn save_blob(&self, category: Category, id: &str, content: &mut dyn Read) -> Result<u64> {
        self.fs.save_blob(&self.layout.blob_path(category, id), content)
    }

    pub fn save_blob_bytes(&self, category: Category, id: &str, content: &[u8]) -> Result<u64> {
        let mut reader = content;
        self.save_blob(category, id, &mut reader)
    }

    pub fn check_blob(&self, category: Category, id: &str) -> Result<u64> {
        self.fs.check_blob(&self.layout.blob_path(category, id))
    }

    /// Remove a blob; succeeds if it is already gone.
    pub fn delete_blob(&self, category: Category, id: &str) -> Result<()> {
        self.fs
            .delete_blob(&self.layout.blob_path(category, id), false)
            .map(|_| ())
    }

    /// Remove a blob and return the size it had, 0 if it was already gone.
    pub fn delete_blob_sized(&self, category: Category, id: &str) -> Result<u64> {
        self.fs.delete_blob(&self.layout.blob_path(category, id), true)
    }
}
