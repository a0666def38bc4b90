//! SHA-256 content identifiers
//!
//! Identifiers are bare lowercase hex digests, which is what the data shard
//! layout expects: the first two characters pick the shard.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

/// Identifier of in-memory content.
pub fn compute_id(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Identifier of everything `reader` yields.
pub fn compute_reader_id(reader: &mut dyn Read) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    std::io::copy(reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Identifier of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_id(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    compute_reader_id(&mut file).map_err(|e| Error::io(path, e))
}
