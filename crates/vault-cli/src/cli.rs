//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vault_fs::Category;
use vault_fs::settings::parse_mode;

/// Vault - Inspect and maintain local backup repositories
#[derive(Parser, Debug)]
#[command(name = "vault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Repository root (overrides the settings file)
    #[arg(long, global = true, env = "VAULT_ROOT")]
    pub root: Option<PathBuf>,

    /// Settings file (.toml, .json, .yaml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_mode_arg(s: &str) -> Result<u32, String> {
    parse_mode(s).ok_or_else(|| format!("'{s}' is not an octal permission mode"))
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the repository directory skeleton
    ///
    /// Safe to run again on an existing repository.
    ///
    /// Examples:
    ///   vault --root /srv/backup init
    ///   vault init --mode 0750
    Init {
        /// Directory permission mode, octal (default from settings)
        #[arg(long, value_parser = parse_mode_arg)]
        mode: Option<u32>,
    },

    /// List blobs of a category
    List {
        /// data, index, keys, locks or snapshots
        category: Category,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the size of a blob in bytes
    Stat {
        category: Category,
        id: String,
    },

    /// Write a blob's raw content to stdout
    Cat {
        category: Category,
        id: String,
    },

    /// Store a file as a blob and print its identifier
    ///
    /// Without --id the identifier is the SHA-256 of the content.
    /// Use '-' to read from stdin.
    Put {
        category: Category,
        file: PathBuf,

        /// Store under this identifier instead of the content hash
        #[arg(long)]
        id: Option<String>,
    },

    /// Delete a blob (succeeds if it is already gone)
    Rm {
        category: Category,
        id: String,

        /// Print the size the blob had before deletion
        #[arg(long)]
        size: bool,
    },

    /// Manage the repository config record
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config record actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write the config record to stdout
    Get,
    /// Print the size of the config record
    Stat,
    /// Replace the config record with the contents of a file ('-' for stdin)
    Set { file: PathBuf },
    /// Delete the config record
    Rm,
}
