//! Init command implementation

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Run the init command
///
/// Creates the root, the category directories and the 256 data shards.
/// Re-running on an existing repository changes nothing.
pub fn run_init(ctx: &Context, mode: Option<u32>) -> Result<()> {
    let mode = mode.unwrap_or(ctx.settings.dir_mode);
    println!(
        "{} Initializing repository (mode {})...",
        "=>".blue().bold(),
        format!("{:04o}", mode).cyan()
    );

    ctx.repo.init(mode)?;

    println!(
        "{} Repository ready at {}",
        "OK".green().bold(),
        ctx.display_root().yellow()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vault_fs::Settings;

    #[test]
    fn test_init_creates_skeleton() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::new(Settings::with_root(temp.path().join("repo")));

        run_init(&ctx, None).unwrap();

        assert!(temp.path().join("repo/data/ff").is_dir());
        assert!(temp.path().join("repo/locks").is_dir());
    }

    #[test]
    fn test_init_twice_succeeds() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::new(Settings::with_root(temp.path().join("repo")));

        run_init(&ctx, Some(0o700)).unwrap();
        assert!(run_init(&ctx, Some(0o700)).is_ok());
    }
}
