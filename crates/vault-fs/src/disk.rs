//! Local-disk [`Filesystem`]

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use tempfile::Builder;

use crate::constants::TEMP_PREFIX;
use crate::durability::Durability;
use crate::filesystem::{Blob, Filesystem};
use crate::settings::Settings;
use crate::{Error, Result, init};

/// Default permission bits of stored files.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Default permission bits of repository directories.
pub const DEFAULT_DIR_MODE: u32 = 0o700;

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Create `dir` and any missing ancestors with `dir_mode`, then flush the
/// parent of each directory that was created.
fn create_missing_dir(durability: &Durability, dir: &Path, dir_mode: u32) -> Result<()> {
    let mut missing = Vec::new();
    let mut cursor = Some(dir);
    while let Some(path) = cursor {
        if path.as_os_str().is_empty() || path.exists() {
            break;
        }
        missing.push(path);
        cursor = path.parent();
    }

    tracing::debug!(
        dir = %dir.display(),
        mode = %format!("{dir_mode:o}"),
        created = missing.len(),
        "creating missing directory"
    );
    init::dir_builder(dir_mode, true)
        .create(dir)
        .map_err(|e| Error::io(dir, e))?;

    // Outermost first, so each entry is durable before its children
    for created in missing.iter().rev() {
        durability.sync_dir(parent_dir(created))?;
    }
    Ok(())
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// The temporary file is flushed, renamed over `path`, and then the directory
/// is flushed. A missing destination directory is created with `dir_mode`.
/// If anything fails before the rename, the temporary file is removed and
/// `path` is untouched.
pub(crate) fn write_atomic(
    durability: &Durability,
    file_mode: u32,
    dir_mode: u32,
    path: &Path,
    content: &mut dyn Read,
) -> Result<u64> {
    let dir = parent_dir(path);
    let builder = {
        let mut builder = Builder::new();
        builder.prefix(TEMP_PREFIX);
        builder
    };

    let mut temp = match builder.tempfile_in(dir) {
        Ok(temp) => temp,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            create_missing_dir(durability, dir, dir_mode)?;
            builder.tempfile_in(dir).map_err(|e| Error::io(dir, e))?
        }
        Err(e) => return Err(Error::io(dir, e)),
    };

    let written = io::copy(content, temp.as_file_mut()).map_err(|e| Error::io(temp.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(file_mode))
            .map_err(|e| Error::io(temp.path(), e))?;
    }
    #[cfg(not(unix))]
    let _ = file_mode;

    durability.sync_file(temp.as_file(), temp.path())?;

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;

    durability.sync_dir(dir)?;

    Ok(written)
}

/// Repository storage on a local filesystem.
///
/// Holds only immutable policy, so a single instance can serve any number of
/// threads and repositories.
#[derive(Debug, Clone)]
pub struct DiskFilesystem {
    durability: Durability,
    file_mode: u32,
    dir_mode: u32,
}

impl Default for DiskFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskFilesystem {
    /// Flush through the OS, files created with mode `0600` and directories
    /// with `0700`.
    pub fn new() -> Self {
        Self {
            durability: Durability::detect(),
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            durability: Durability::from_enabled(settings.fsync),
            file_mode: settings.file_mode,
            dir_mode: settings.dir_mode,
        }
    }

    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    /// Mode of directories a save has to recreate.
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    pub fn durability(&self) -> &Durability {
        &self.durability
    }

    fn size_of(path: &Path) -> Result<u64> {
        fs::metadata(path)
            .map(|meta| meta.len())
            .map_err(|e| Error::io(path, e))
    }

    /// Regular files directly in `dir`, skipping temporaries and entries that
    /// vanish while being listed.
    fn collect_blobs(dir: &Path, out: &mut Vec<Blob>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::warn!(dir = %dir.display(), name = ?name, "skipping non UTF-8 entry");
                continue;
            };
            if name.starts_with(TEMP_PREFIX) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.is_file() => out.push(Blob::new(name, meta.len())),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::io(entry.path(), e)),
            }
        }
        Ok(())
    }
}

impl Filesystem for DiskFilesystem {
    fn create_repo(&self, root: &Path, mode: u32) -> Result<()> {
        init::create_repo(root, mode)
    }

    fn get_config(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| Error::io(path, e))
    }

    fn check_config(&self, path: &Path) -> Result<u64> {
        Self::size_of(path)
    }

    fn save_config(&self, path: &Path, content: &[u8]) -> Result<()> {
        let mut reader = content;
        write_atomic(&self.durability, self.file_mode, self.dir_mode, path, &mut reader)?;
        tracing::debug!(path = %path.display(), size = content.len(), "saved config");
        Ok(())
    }

    fn delete_config(&self, path: &Path) -> Result<()> {
        self.delete_blob(path, false).map(|_| ())
    }

    fn list_blobs(&self, dir: &Path, sharded: bool) -> Result<Vec<Blob>> {
        let mut blobs = Vec::new();

        if sharded {
            let shards = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
            for shard in shards {
                let shard = shard.map_err(|e| Error::io(dir, e))?;
                let is_dir = shard.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    continue;
                }
                match Self::collect_blobs(&shard.path(), &mut blobs) {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
            }
        } else {
            Self::collect_blobs(dir, &mut blobs)?;
        }

        blobs.sort();
        Ok(blobs)
    }

    fn get_blob(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Box::new(file))
    }

    fn save_blob(&self, path: &Path, content: &mut dyn Read) -> Result<u64> {
        let written = write_atomic(&self.durability, self.file_mode, self.dir_mode, path, content)?;
        tracing::debug!(path = %path.display(), size = written, "saved blob");
        Ok(written)
    }

    fn check_blob(&self, path: &Path) -> Result<u64> {
        Self::size_of(path)
    }

    fn delete_blob(&self, path: &Path, need_size: bool) -> Result<u64> {
        let size = if need_size {
            fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
        } else {
            0
        };

        match fs::remove_file(path) {
            Ok(()) => {
                self.durability.sync_dir(parent_dir(path))?;
                tracing::debug!(path = %path.display(), "deleted");
                Ok(size)
            }
            // A retried delete whose first attempt already succeeded.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "already absent");
                Ok(0)
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }
}
