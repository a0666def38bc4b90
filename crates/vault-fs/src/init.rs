//! Repository directory skeleton
//!
//! Every step tolerates directories that already exist, so initialization
//! can be re-run after an interrupted first attempt or by several processes
//! at once.

use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::path::Path;

use crate::constants::Category;
use crate::layout::RepoLayout;
use crate::{Error, Result};

pub(crate) fn dir_builder(mode: u32, recursive: bool) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder
}

fn create_dir_tolerant(builder: &DirBuilder, path: &Path) -> Result<()> {
    match builder.create(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Create `root`, its category directories and the 256 data shards.
///
/// `mode` applies to every directory created (subject to the umask). The
/// first failure other than "already exists" is returned; directories made
/// before it are left in place.
pub fn create_repo(root: &Path, mode: u32) -> Result<()> {
    tracing::debug!(root = %root.display(), mode = %format!("{mode:o}"), "creating repository");

    dir_builder(mode, true)
        .create(root)
        .map_err(|e| Error::io(root, e))?;

    let layout = RepoLayout::new(root);
    let builder = dir_builder(mode, false);

    for category in Category::ALL {
        create_dir_tolerant(&builder, &layout.category_dir(category))?;
    }

    for shard_dir in layout.shard_dirs() {
        create_dir_tolerant(&builder, &shard_dir)?;
    }

    tracing::debug!(root = %root.display(), "repository skeleton ready");
    Ok(())
}
