//! Syncer doubles.
//!
//! Pick the one matching the filesystem behaviour under test:
//! - [`UnsupportedSyncer`]: every flush reports "operation not supported"
//! - [`FailingSyncer`]: every flush reports the given error kind
//! - [`CountingSyncer`]: flushes for real and counts the calls

use std::fs::File;
use std::io::{self, ErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vault_fs::Syncer;

/// A filesystem that cannot flush anything (e.g. some network mounts).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSyncer;

impl Syncer for UnsupportedSyncer {
    fn sync_file(&self, _file: &File) -> io::Result<()> {
        Err(io::Error::new(
            ErrorKind::Unsupported,
            "fsync not supported by this filesystem",
        ))
    }
}

/// A device that fails every flush with `kind`.
#[derive(Debug, Clone, Copy)]
pub struct FailingSyncer {
    pub kind: ErrorKind,
}

impl FailingSyncer {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl Syncer for FailingSyncer {
    fn sync_file(&self, _file: &File) -> io::Result<()> {
        Err(io::Error::new(self.kind, "simulated flush failure"))
    }
}

/// Flushes through the OS and counts file and directory flushes.
///
/// Clones share their counters, so keep one clone for assertions and hand
/// the other to [`Durability::with_syncer`](vault_fs::Durability::with_syncer).
#[derive(Debug, Default, Clone)]
pub struct CountingSyncer {
    files: Arc<AtomicUsize>,
    dirs: Arc<AtomicUsize>,
}

impl CountingSyncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_syncs(&self) -> usize {
        self.files.load(Ordering::SeqCst)
    }

    pub fn dir_syncs(&self) -> usize {
        self.dirs.load(Ordering::SeqCst)
    }
}

impl Syncer for CountingSyncer {
    fn sync_file(&self, file: &File) -> io::Result<()> {
        self.files.fetch_add(1, Ordering::SeqCst);
        file.sync_all()
    }

    fn sync_dir(&self, dir: &File) -> io::Result<()> {
        self.dirs.fetch_add(1, Ordering::SeqCst);
        dir.sync_all()
    }
}
