//! Settings resolution for CLI commands
//!
//! Precedence, lowest first:
//! 1. built-in defaults
//! 2. `<config dir>/vault/settings.toml`, if it exists
//! 3. the file given with `--settings`
//! 4. `--root` / `VAULT_ROOT`

use std::path::{Path, PathBuf};

use vault_fs::{Repository, Settings, SettingsStore};

use crate::error::Result;

/// Location of the per-user settings file.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vault").join("settings.toml"))
}

/// Resolve settings from the command line and the user's settings file.
pub fn resolve_settings(root: Option<&Path>, settings_file: Option<&Path>) -> Result<Settings> {
    let store = SettingsStore::new();

    let mut settings = match settings_file {
        Some(path) => {
            tracing::debug!(?path, "Loading settings file");
            store.load(path)?
        }
        None => match default_settings_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(?path, "Loading user settings");
                store.load(&path)?
            }
            _ => Settings::default(),
        },
    };

    if let Some(root) = root {
        settings.root = root.to_path_buf();
    }

    tracing::debug!(root = ?settings.root, fsync = settings.fsync, "Resolved settings");
    Ok(settings)
}

/// Settings plus the repository they describe.
pub struct Context {
    pub settings: Settings,
    pub repo: Repository,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        let repo = Repository::from_settings(&settings);
        Self { settings, repo }
    }

    /// Root for display, canonicalized when it exists.
    pub fn display_root(&self) -> String {
        let root = &self.settings.root;
        dunce::canonicalize(root)
            .unwrap_or_else(|_| root.clone())
            .display()
            .to_string()
    }
}
