//! The `claude`-backed plugin inventory

use std::path::{Path, PathBuf};

use fettle_core::{AvailablePlugin, InstalledPlugin, PluginInventory, Scope};

use crate::actions::PluginActions;
use crate::cli::ClaudeCli;
use crate::error::{ClaudeError, Result};
use crate::marketplace::{InstalledMarketplace, list_available_plugins};

/// Installed plugins from `claude plugin list`, available ones from the
/// cloned marketplace manifests.
#[derive(Debug, Clone)]
pub struct ClaudeInventory {
    cli: ClaudeCli,
    marketplaces_dir: PathBuf,
}

impl ClaudeInventory {
    pub fn new(cli: ClaudeCli, marketplaces_dir: impl Into<PathBuf>) -> Self {
        Self {
            cli,
            marketplaces_dir: marketplaces_dir.into(),
        }
    }

    pub fn cli(&self) -> &ClaudeCli {
        &self.cli
    }

    pub fn marketplaces_dir(&self) -> &Path {
        &self.marketplaces_dir
    }
}

impl PluginInventory for ClaudeInventory {
    type Error = ClaudeError;

    fn list(&self) -> Result<Vec<InstalledPlugin>> {
        self.cli.list_plugins()
    }

    fn list_available(&self) -> Result<Vec<AvailablePlugin>> {
        list_available_plugins(&self.marketplaces_dir)
    }
}

impl PluginActions for ClaudeInventory {
    type Error = ClaudeError;

    fn install(&self, id: &str) -> Result<()> {
        self.cli.install_plugin(id)
    }

    fn update(&self, id: &str, scope: Scope) -> Result<()> {
        self.cli.update_plugin(id, scope)
    }

    fn refresh_marketplaces(&self) -> Result<()> {
        self.cli.refresh_marketplaces()
    }

    fn add_marketplace(&self, source: &str) -> Result<()> {
        self.cli.add_marketplace(source)
    }

    fn registered_marketplaces(&self) -> Vec<InstalledMarketplace> {
        self.cli.list_marketplaces()
    }
}
