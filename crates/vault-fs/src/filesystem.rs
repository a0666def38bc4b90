//! The storage capability consumed by the layers above

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// A stored blob: its identifier and current byte length.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Blob {
    pub name: String,
    pub size: u64,
}

impl Blob {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Path-based storage operations of a repository backend.
///
/// Implementations must be safe to call from many threads at once and hold
/// no state that a retry could observe. In particular:
/// - writes are atomic: a reader sees either the previous or the new full
///   content under the final name, never a prefix;
/// - deletes are idempotent: removing an absent entry succeeds;
/// - nothing retries internally.
///
/// [`DiskFilesystem`](crate::DiskFilesystem) is the local-disk variant.
pub trait Filesystem: Send + Sync {
    /// Create the directory skeleton of a repository at `root`.
    fn create_repo(&self, root: &Path, mode: u32) -> Result<()>;

    /// Read the whole config record.
    fn get_config(&self, path: &Path) -> Result<Vec<u8>>;

    /// Size of the config record in bytes.
    fn check_config(&self, path: &Path) -> Result<u64>;

    /// Replace the config record with `content`.
    fn save_config(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Remove the config record. Absent is fine.
    fn delete_config(&self, path: &Path) -> Result<()>;

    /// Blobs stored in `dir`. With `sharded`, blobs are looked up one level
    /// down, in each subdirectory of `dir`.
    fn list_blobs(&self, dir: &Path, sharded: bool) -> Result<Vec<Blob>>;

    /// Open a blob for reading.
    fn get_blob(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// Store everything `content` yields at `path`. Returns the byte count.
    fn save_blob(&self, path: &Path, content: &mut dyn Read) -> Result<u64>;

    /// Size of a blob in bytes.
    fn check_blob(&self, path: &Path) -> Result<u64>;

    /// Remove a blob. Absent is fine.
    ///
    /// With `need_size`, returns the size the blob had just before removal,
    /// or 0 if it was already gone. Without it, always returns 0.
    fn delete_blob(&self, path: &Path, need_size: bool) -> Result<u64>;
}
