//! Config record commands

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use vault_fs::Repository;

use super::read_input;
use crate::error::Result;

/// Run the config get command: raw bytes to `out`.
pub fn run_config_get(repo: &Repository, out: &mut dyn Write) -> Result<()> {
    let content = repo.get_config()?;
    out.write_all(&content)?;
    out.flush()?;
    Ok(())
}

/// Run the config stat command
pub fn run_config_stat(repo: &Repository, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", repo.check_config()?)?;
    Ok(())
}

/// Run the config set command
pub fn run_config_set(repo: &Repository, file: &Path, out: &mut dyn Write) -> Result<()> {
    let content = read_input(file)?;
    repo.save_config(&content)?;
    writeln!(
        out,
        "{} Saved config ({} bytes)",
        "OK".green().bold(),
        content.len()
    )?;
    Ok(())
}

/// Run the config rm command
pub fn run_config_rm(repo: &Repository, out: &mut dyn Write) -> Result<()> {
    repo.delete_config()?;
    writeln!(out, "{} Removed config", "OK".green().bold())?;
    Ok(())
}
