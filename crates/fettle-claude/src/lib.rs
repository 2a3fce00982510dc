//! Claude plugin system integration for fettle
//!
//! Wraps the `claude plugin` CLI as a subprocess and reads the marketplace
//! manifests Claude keeps on disk. [`ClaudeInventory`] ties both together
//! behind the engine's [`fettle_core::PluginInventory`] trait and the
//! [`PluginActions`] trait used for installs and updates.

pub mod actions;
pub mod cli;
pub mod error;
pub mod inventory;
pub mod marketplace;

pub use actions::PluginActions;
pub use cli::{ClaudeCli, DEFAULT_CLAUDE_BIN, parse_plugin_list};
pub use error::{ClaudeError, Result};
pub use inventory::ClaudeInventory;
pub use marketplace::{
    EnsureMarketplacesResult, InstalledMarketplace, MarketplaceFailure, ensure_marketplaces,
    installed_marketplaces, is_marketplace_source_installed, list_available_plugins,
    normalize_github_source,
};
