//! fettle CLI
//!
//! Reconciles the plugins a project declares in `.claude/fettle.toml` with
//! what the `claude` plugin CLI has installed.

mod cli;
mod commands;
mod context;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;
use fettle_claude::{ClaudeCli, ClaudeInventory};

use cli::{Cli, Commands, MarketplaceAction};
use commands::{CommandOutput, InstallOptions, StatusOptions, UpdateOptions};
use context::AppContext;
use error::{CliError, Result};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(result) => {
            result.emit();
            std::process::exit(result.exit_code);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<CommandOutput> {
    let Some(command) = cli.command else {
        return Ok(CommandOutput::success(format!(
            "{} Context-aware plugin manager for Claude Code\n\nRun {} for available commands.",
            "fettle".green().bold(),
            "fettle --help".cyan()
        )));
    };

    if let Commands::Completions { shell } = command {
        return Ok(commands::run_completions(shell));
    }

    if cli.claude_bin.trim().is_empty() {
        return Err(CliError::user("--claude-bin must not be empty"));
    }

    let cwd = std::env::current_dir()?;
    let ctx = AppContext::discover(&cwd)?;
    tracing::debug!(root = %ctx.root().display(), claude_bin = %cli.claude_bin, "Starting");

    let mut claude = ClaudeCli::new(&cli.claude_bin);
    if let Some(dir) = ctx.paths.custom_claude_home() {
        claude = claude.with_config_dir(dir);
    }
    let backend = ClaudeInventory::new(claude, ctx.paths.marketplaces_dir());

    match command {
        Commands::Status { json, refresh } => {
            commands::run_status(&ctx, &backend, StatusOptions { json, refresh })
        }
        Commands::Install { dry_run, hook } => {
            commands::run_install(&ctx, &backend, InstallOptions { dry_run, hook })
        }
        Commands::Update {
            ids,
            dry_run,
            refresh,
        } => commands::run_update(&ctx, &backend, &ids, UpdateOptions { dry_run, refresh }),
        Commands::Profiles => commands::run_profiles(&ctx),
        Commands::Marketplace {
            action: MarketplaceAction::Refresh,
        } => commands::run_marketplace_refresh(&backend),
        Commands::Completions { shell } => Ok(commands::run_completions(shell)),
    }
}
