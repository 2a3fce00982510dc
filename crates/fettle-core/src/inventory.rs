//! Snapshot collaborators for installed and available plugins.
//!
//! The engine never queries these itself. Drivers materialise a snapshot
//! through this trait and pass plain slices into [`crate::diff`] and
//! [`crate::outdated`], which keeps every engine function deterministic.

use crate::diff::InstalledPlugin;
use crate::outdated::AvailablePlugin;

/// Source of installed and marketplace plugin records.
pub trait PluginInventory {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every installed plugin, across all scopes and projects.
    fn list(&self) -> Result<Vec<InstalledPlugin>, Self::Error>;

    /// Every plugin currently offered by a known marketplace.
    fn list_available(&self) -> Result<Vec<AvailablePlugin>, Self::Error>;
}

impl<T: PluginInventory + ?Sized> PluginInventory for &T {
    type Error = T::Error;

    fn list(&self) -> Result<Vec<InstalledPlugin>, Self::Error> {
        (**self).list()
    }

    fn list_available(&self) -> Result<Vec<AvailablePlugin>, Self::Error> {
        (**self).list_available()
    }
}
