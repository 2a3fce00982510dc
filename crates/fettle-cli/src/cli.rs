//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use fettle_claude::DEFAULT_CLAUDE_BIN;

/// fettle - Context-aware plugin manager for Claude Code
#[derive(Parser, Debug)]
#[command(name = "fettle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The claude executable to drive
    #[arg(long, global = true, env = "FETTLE_CLAUDE_BIN", default_value = DEFAULT_CLAUDE_BIN)]
    pub claude_bin: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show desired vs installed plugin state
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Refresh marketplaces before checking for updates
        #[arg(long)]
        refresh: bool,
    },

    /// Install missing plugins for this project
    ///
    /// Examples:
    ///   fettle install              # Install everything missing
    ///   fettle install --dry-run    # Show what would be installed
    ///   fettle install --hook       # Quiet mode for a session-start hook
    Install {
        /// Show what would be installed without installing
        #[arg(long)]
        dry_run: bool,

        /// Hook mode: silent unless something was installed, errors on stderr
        #[arg(long)]
        hook: bool,
    },

    /// Update outdated plugins installed for this project
    ///
    /// Examples:
    ///   fettle update                 # Update everything outdated
    ///   fettle update git@my-market   # Update a single plugin
    Update {
        /// Plugin ids to update (all outdated when omitted)
        ids: Vec<String>,

        /// Show what would be updated without updating
        #[arg(long)]
        dry_run: bool,

        /// Refresh marketplaces first
        #[arg(long)]
        refresh: bool,
    },

    /// List available profiles
    Profiles,

    /// Marketplace operations
    Marketplace {
        #[command(subcommand)]
        action: MarketplaceAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Marketplace subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceAction {
    /// Pull the latest plugin listings of every marketplace
    Refresh,
}
