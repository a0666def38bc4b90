//! Repository directory layout
//!
//! Pure mapping from (category, identifier) to filesystem paths. Nothing here
//! touches the disk and nothing here validates identifiers.

use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILE, Category, SHARD_COUNT};

/// Shard prefix of an identifier: its first two characters.
///
/// Identifiers are lowercase hex digests, so this is always one of
/// `00`..`ff` for them. Shorter input is returned whole.
pub fn shard(id: &str) -> &str {
    match id.char_indices().nth(2) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Name of the shard directory with the given index (`00`..`ff`).
pub fn shard_name(index: u8) -> String {
    format!("{:02x}", index)
}

/// Path resolution rooted at a repository directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `root/config`
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// `root/<category>`
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category)
    }

    /// `root/data/<shard>`
    pub fn shard_dir(&self, shard: &str) -> PathBuf {
        self.category_dir(Category::Data).join(shard)
    }

    /// All 256 shard directories, `data/00` first.
    pub fn shard_dirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (0..SHARD_COUNT).map(|i| self.shard_dir(&shard_name(i as u8)))
    }

    /// Directory a blob of `category` with identifier `id` lives in.
    pub fn blob_dir(&self, category: Category, id: &str) -> PathBuf {
        if category.is_sharded() {
            self.shard_dir(shard(id))
        } else {
            self.category_dir(category)
        }
    }

    /// `root/data/<shard>/<id>` for data, `root/<category>/<id>` otherwise.
    pub fn blob_path(&self, category: Category, id: &str) -> PathBuf {
        self.blob_dir(category, id).join(id)
    }
}
