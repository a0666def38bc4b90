//! Durable flush of files and directories
//!
//! Both flushes are best-effort: a filesystem that cannot flush is not an
//! error. Which error kinds count as "cannot flush" is spelled out in the
//! [`FILE_SYNC_TOLERATED`] and [`DIR_SYNC_TOLERATED`] allow-lists.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use crate::{Error, Result};

/// Error kinds a file flush may report without failing the operation.
pub const FILE_SYNC_TOLERATED: &[ErrorKind] = &[ErrorKind::Unsupported];

/// Error kinds a directory flush may report without failing the operation.
pub const DIR_SYNC_TOLERATED: &[ErrorKind] = &[
    ErrorKind::Unsupported,
    ErrorKind::NotFound,
    ErrorKind::InvalidInput,
];

// ENOTSUP is not mapped to `ErrorKind::Unsupported` by std.
#[cfg(target_os = "linux")]
const ENOTSUP: Option<i32> = Some(95);
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
const ENOTSUP: Option<i32> = Some(45);
#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd"
)))]
const ENOTSUP: Option<i32> = None;

// macOS reports ENOTTY from F_FULLFSYNC on filesystems like SMB mounts.
#[cfg(target_os = "macos")]
const ENOTTY: Option<i32> = Some(25);
#[cfg(not(target_os = "macos"))]
const ENOTTY: Option<i32> = None;

/// Result of a flush request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The OS accepted the flush.
    Synced,
    /// The filesystem or platform cannot flush; treated as success.
    Unsupported,
    /// Durability is disabled for this backend.
    Skipped,
}

impl SyncOutcome {
    /// Whether the no-op path was taken.
    pub fn is_noop(&self) -> bool {
        !matches!(self, Self::Synced)
    }
}

/// The system call behind a flush.
///
/// [`OsSyncer`] is the real thing; tests substitute implementations that
/// report errors the local filesystem would never produce.
pub trait Syncer: Send + Sync + std::fmt::Debug {
    /// Flush a regular file.
    fn sync_file(&self, file: &File) -> io::Result<()>;

    /// Flush an open directory handle.
    fn sync_dir(&self, dir: &File) -> io::Result<()> {
        self.sync_file(dir)
    }
}

/// Flushes through `fsync` (or the platform equivalent).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSyncer;

impl Syncer for OsSyncer {
    fn sync_file(&self, file: &File) -> io::Result<()> {
        file.sync_all()
    }
}

fn is_tolerated(err: &io::Error, allowed: &[ErrorKind], raw: &[Option<i32>]) -> bool {
    if allowed.contains(&err.kind()) {
        return true;
    }
    match err.raw_os_error() {
        Some(code) => raw.iter().flatten().any(|&c| c == code),
        None => false,
    }
}

/// Classify the result of a file flush.
pub fn classify_file_sync(result: io::Result<()>) -> io::Result<SyncOutcome> {
    match result {
        Ok(()) => Ok(SyncOutcome::Synced),
        Err(e) if is_tolerated(&e, FILE_SYNC_TOLERATED, &[ENOTSUP, ENOTTY]) => {
            Ok(SyncOutcome::Unsupported)
        }
        Err(e) => Err(e),
    }
}

/// Classify the result of a directory flush.
pub fn classify_dir_sync(result: io::Result<()>) -> io::Result<SyncOutcome> {
    match result {
        Ok(()) => Ok(SyncOutcome::Synced),
        Err(e) if is_tolerated(&e, DIR_SYNC_TOLERATED, &[ENOTSUP]) => {
            Ok(SyncOutcome::Unsupported)
        }
        Err(e) => Err(e),
    }
}

/// Flush policy of a backend.
///
/// Resolve the platform capability once with [`Durability::detect`] and hand
/// the value to whatever needs to flush.
#[derive(Debug, Clone)]
pub struct Durability {
    enabled: bool,
    dir_sync_supported: bool,
    syncer: Arc<dyn Syncer>,
}

impl Default for Durability {
    fn default() -> Self {
        Self::detect()
    }
}

impl Durability {
    /// Flush through the OS. Directory flush is off on Windows, which has no
    /// directory durability primitive.
    pub fn detect() -> Self {
        Self {
            enabled: true,
            dir_sync_supported: !cfg!(windows),
            syncer: Arc::new(OsSyncer),
        }
    }

    /// Never flush. For scratch repositories and benchmarks.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::detect()
        }
    }

    /// `true` keeps [`Durability::detect`], `false` is [`Durability::disabled`].
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::detect()
        } else {
            Self::disabled()
        }
    }

    pub fn with_syncer(mut self, syncer: impl Syncer + 'static) -> Self {
        self.syncer = Arc::new(syncer);
        self
    }

    pub fn with_dir_sync(mut self, supported: bool) -> Self {
        self.dir_sync_supported = supported;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dir_sync_supported(&self) -> bool {
        self.dir_sync_supported
    }

    /// Flush `file`, which was opened from `path`.
    pub fn sync_file(&self, file: &File, path: &Path) -> Result<SyncOutcome> {
        if !self.enabled {
            return Ok(SyncOutcome::Skipped);
        }
        let outcome =
            classify_file_sync(self.syncer.sync_file(file)).map_err(|e| Error::io(path, e))?;
        if outcome == SyncOutcome::Unsupported {
            tracing::debug!(path = %path.display(), "file sync not supported, continuing");
        }
        Ok(outcome)
    }

    /// Flush the directory entries of `dir`.
    ///
    /// The directory handle is dropped on every return path.
    pub fn sync_dir(&self, dir: &Path) -> Result<SyncOutcome> {
        if !self.enabled {
            return Ok(SyncOutcome::Skipped);
        }
        if !self.dir_sync_supported {
            return Ok(SyncOutcome::Unsupported);
        }
        let handle = File::open(dir).map_err(|e| Error::io(dir, e))?;
        let outcome =
            classify_dir_sync(self.syncer.sync_dir(&handle)).map_err(|e| Error::io(dir, e))?;
        if outcome == SyncOutcome::Unsupported {
            tracing::debug!(path = %dir.display(), "directory sync not supported, continuing");
        }
        Ok(outcome)
    }
}
