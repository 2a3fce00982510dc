//! Mutating operations against the plugin system

use fettle_core::Scope;

use crate::marketplace::InstalledMarketplace;

/// Side effects the reconciliation drivers may request.
pub trait PluginActions {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Install a plugin for the current project (local scope).
    fn install(&self, id: &str) -> Result<(), Self::Error>;

    fn update(&self, id: &str, scope: Scope) -> Result<(), Self::Error>;

    /// Pull the latest manifests of every known marketplace.
    fn refresh_marketplaces(&self) -> Result<(), Self::Error>;

    fn add_marketplace(&self, source: &str) -> Result<(), Self::Error>;

    /// Marketplaces the plugin system already knows, under any name.
    /// Empty when they cannot be listed.
    fn registered_marketplaces(&self) -> Vec<InstalledMarketplace>;
}

impl<T: PluginActions + ?Sized> PluginActions for &T {
    type Error = T::Error;

    fn install(&self, id: &str) -> Result<(), Self::Error> {
        (**self).install(id)
    }

    fn update(&self, id: &str, scope: Scope) -> Result<(), Self::Error> {
        (**self).update(id, scope)
    }

    fn refresh_marketplaces(&self) -> Result<(), Self::Error> {
        (**self).refresh_marketplaces()
    }

    fn add_marketplace(&self, source: &str) -> Result<(), Self::Error> {
        (**self).add_marketplace(source)
    }

    fn registered_marketplaces(&self) -> Vec<InstalledMarketplace> {
        (**self).registered_marketplaces()
    }
}
