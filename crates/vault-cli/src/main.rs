//! Vault CLI
//!
//! Command-line access to the local-disk repository backend.

mod cli;
mod commands;
mod context;
mod error;

use std::io::Write;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, ConfigAction};
use context::{Context, resolve_settings};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `cat` and `config get` output stays clean
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => {
            let settings = resolve_settings(cli.root.as_deref(), cli.settings.as_deref())?;
            let ctx = Context::new(settings);
            execute_command(&ctx, cmd)
        }
        None => {
            // No command provided - show help hint
            println!("{} local backup repository tool", "vault".green().bold());
            println!();
            println!("Run {} for available commands.", "vault --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let repo = &ctx.repo;

    match cmd {
        Commands::Init { mode } => commands::run_init(ctx, mode),
        Commands::List { category, json } => commands::run_list(repo, category, json, &mut out),
        Commands::Stat { category, id } => commands::run_stat(repo, category, &id, &mut out),
        Commands::Cat { category, id } => commands::run_cat(repo, category, &id, &mut out),
        Commands::Put { category, file, id } => {
            commands::run_put(repo, category, &file, id.as_deref(), &mut out)
        }
        Commands::Rm { category, id, size } => {
            commands::run_rm(repo, category, &id, size, &mut out)
        }
        Commands::Config { action } => match action {
            ConfigAction::Get => commands::run_config_get(repo, &mut out),
            ConfigAction::Stat => commands::run_config_stat(repo, &mut out),
            ConfigAction::Set { file } => commands::run_config_set(repo, &file, &mut out),
            ConfigAction::Rm => commands::run_config_rm(repo, &mut out),
        },
    }?;

    out.flush()?;
    Ok(())
}
