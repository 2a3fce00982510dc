//! [`FakeBackend`]: an in-memory stand-in for the `claude` CLI.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use fettle_claude::{InstalledMarketplace, PluginActions};
use fettle_core::{AvailablePlugin, InstalledPlugin, PluginInventory, Scope};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// Records every action and mutates its inventory the way the real CLI would.
#[derive(Debug, Default)]
pub struct FakeBackend {
    project_path: PathBuf,
    installed: RefCell<Vec<InstalledPlugin>>,
    available: Vec<AvailablePlugin>,
    registered: Vec<InstalledMarketplace>,
    failing: HashSet<String>,
    list_error: Option<String>,
    installs: RefCell<Vec<String>>,
    updates: RefCell<Vec<(String, Scope)>>,
    marketplace_adds: RefCell<Vec<String>>,
    refreshes: RefCell<usize>,
}

impl FakeBackend {
    /// A backend whose local installs belong to `project_path`.
    pub fn new(project_path: impl AsRef<Path>) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Add a plugin installed locally for the project.
    pub fn with_local(self, id: &str, version: &str) -> Self {
        let plugin = InstalledPlugin {
            id: id.to_string(),
            version: version.to_string(),
            scope: Scope::Local,
            enabled: true,
            project_path: Some(self.project_path.clone()),
        };
        self.with_installed(plugin)
    }

    pub fn with_installed(self, plugin: InstalledPlugin) -> Self {
        self.installed.borrow_mut().push(plugin);
        self
    }

    /// Offer `id` at `version` from the marketplace named after its `@` suffix.
    pub fn with_available(mut self, id: &str, version: &str) -> Self {
        let marketplace = id.split_once('@').map(|(_, m)| m).unwrap_or_default();
        self.available.push(AvailablePlugin {
            id: id.to_string(),
            version: version.to_string(),
            marketplace: marketplace.to_string(),
        });
        self
    }

    /// Report a GitHub marketplace `repo` (`owner/name`) as already registered.
    pub fn with_registered_marketplace(mut self, name: &str, repo: &str) -> Self {
        self.registered.push(InstalledMarketplace {
            name: name.to_string(),
            source: "github".to_string(),
            repo: Some(repo.to_string()),
            url: None,
            install_location: None,
        });
        self
    }

    /// Make install, update and marketplace add fail for this id or source.
    pub fn failing_on(mut self, target: &str) -> Self {
        self.failing.insert(target.to_string());
        self
    }

    /// Make `list` fail.
    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn installs(&self) -> Vec<String> {
        self.installs.borrow().clone()
    }

    pub fn updates(&self) -> Vec<(String, Scope)> {
        self.updates.borrow().clone()
    }

    pub fn marketplace_adds(&self) -> Vec<String> {
        self.marketplace_adds.borrow().clone()
    }

    pub fn refreshes(&self) -> usize {
        *self.refreshes.borrow()
    }

    fn check(&self, target: &str) -> Result<(), FakeError> {
        if self.failing.contains(target) {
            Err(FakeError(format!("simulated failure for {target}")))
        } else {
            Ok(())
        }
    }

    fn available_version(&self, id: &str) -> String {
        self.available
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.version.clone())
            .unwrap_or_default()
    }
}

impl PluginInventory for FakeBackend {
    type Error = FakeError;

    fn list(&self) -> Result<Vec<InstalledPlugin>, FakeError> {
        match &self.list_error {
            Some(message) => Err(FakeError(message.clone())),
            None => Ok(self.installed.borrow().clone()),
        }
    }

    fn list_available(&self) -> Result<Vec<AvailablePlugin>, FakeError> {
        Ok(self.available.clone())
    }
}

impl PluginActions for FakeBackend {
    type Error = FakeError;

    fn install(&self, id: &str) -> Result<(), FakeError> {
        self.installs.borrow_mut().push(id.to_string());
        self.check(id)?;

        let version = self.available_version(id);
        self.installed.borrow_mut().push(InstalledPlugin {
            id: id.to_string(),
            version,
            scope: Scope::Local,
            enabled: true,
            project_path: Some(self.project_path.clone()),
        });
        Ok(())
    }

    fn update(&self, id: &str, scope: Scope) -> Result<(), FakeError> {
        self.updates.borrow_mut().push((id.to_string(), scope));
        self.check(id)?;

        let version = self.available_version(id);
        for plugin in self.installed.borrow_mut().iter_mut() {
            if plugin.id == id && plugin.scope == scope {
                plugin.version = version.clone();
            }
        }
        Ok(())
    }

    fn refresh_marketplaces(&self) -> Result<(), FakeError> {
        *self.refreshes.borrow_mut() += 1;
        Ok(())
    }

    fn add_marketplace(&self, source: &str) -> Result<(), FakeError> {
        self.marketplace_adds.borrow_mut().push(source.to_string());
        self.check(source)
    }

    fn registered_marketplaces(&self) -> Vec<InstalledMarketplace> {
        self.registered.clone()
    }
}
