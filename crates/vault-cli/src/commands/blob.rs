//! Blob commands: list, stat, cat, put, rm

use std::io::{Read, Write};
use std::path::Path;

use colored::Colorize;
use vault_fs::{Category, Repository, checksum};

use crate::error::Result;

/// Run the list command
///
/// Plain output is one `<id> <size>` line per blob, sorted by id.
pub fn run_list(repo: &Repository, category: Category, json: bool, out: &mut dyn Write) -> Result<()> {
    let blobs = repo.list_blobs(category)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &blobs)?;
        writeln!(out)?;
    } else {
        for blob in &blobs {
            writeln!(out, "{} {}", blob.name, blob.size)?;
        }
    }
    Ok(())
}

/// Run the stat command
pub fn run_stat(repo: &Repository, category: Category, id: &str, out: &mut dyn Write) -> Result<()> {
    let size = repo.check_blob(category, id)?;
    writeln!(out, "{}", size)?;
    Ok(())
}

/// Run the cat command
pub fn run_cat(repo: &Repository, category: Category, id: &str, out: &mut dyn Write) -> Result<()> {
    let mut reader = repo.get_blob(category, id)?;
    std::io::copy(&mut reader, out)?;
    out.flush()?;
    Ok(())
}

/// Run the put command
///
/// The input is read exactly once. Without an explicit id it is buffered so
/// the stored bytes are the ones the id was computed from.
pub fn run_put(
    repo: &Repository,
    category: Category,
    file: &Path,
    id: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let id = if file == Path::new("-") {
        put_content(repo, category, &mut std::io::stdin().lock(), id)?
    } else {
        let mut source = std::fs::File::open(file).map_err(|e| vault_fs::Error::io(file, e))?;
        put_content(repo, category, &mut source, id)?
    };

    tracing::debug!(%category, %id, "stored blob");
    writeln!(out, "{}", id)?;
    Ok(())
}

/// Store everything `source` yields and return the id it was stored under.
fn put_content(
    repo: &Repository,
    category: Category,
    source: &mut dyn Read,
    id: Option<&str>,
) -> Result<String> {
    match id {
        Some(id) => {
            repo.save_blob(category, id, source)?;
            Ok(id.to_string())
        }
        None => {
            let mut content = Vec::new();
            source.read_to_end(&mut content)?;
            let id = checksum::compute_id(&content);
            repo.save_blob_bytes(category, &id, &content)?;
            Ok(id)
        }
    }
}

/// Run the rm command
///
/// With `print_size`, prints the size the blob had (0 if it was absent).
pub fn run_rm(
    repo: &Repository,
    category: Category,
    id: &str,
    print_size: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if print_size {
        let size = repo.delete_blob_sized(category, id)?;
        writeln!(out, "{}", size)?;
    } else {
        repo.delete_blob(category, id)?;
        writeln!(out, "{} Removed {}/{}", "OK".green().bold(), category, id)?;
    }
    Ok(())
}
