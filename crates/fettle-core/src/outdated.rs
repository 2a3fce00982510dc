//! Outdated plugin detection against a marketplace snapshot.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diff::{InstalledPlugin, PresentPlugin, Scope};
use crate::version::compare_versions;

/// A plugin offered by a marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailablePlugin {
    /// `name@marketplace`
    pub id: String,
    pub version: String,
    pub marketplace: String,
}

/// An installed plugin with a newer version on offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdatedEntry {
    pub id: String,
    pub installed_version: String,
    pub available_version: String,
    pub scope: Scope,
}

/// Flag present plugins whose installed version is below the marketplace's.
///
/// Failing the resolved constraint is a separate classification; see
/// [`PresentPlugin::satisfies_constraint`].
pub fn find_outdated(present: &[PresentPlugin], available: &[AvailablePlugin]) -> Vec<OutdatedEntry> {
    outdated_among(present.iter().map(|p| &p.installed), available)
}

/// Flag every plugin installed locally for `project_path`, desired or not.
pub fn find_outdated_installed(
    installed: &[InstalledPlugin],
    available: &[AvailablePlugin],
    project_path: &Path,
) -> Vec<OutdatedEntry> {
    outdated_among(
        installed.iter().filter(|p| p.is_local_to(project_path)),
        available,
    )
}

fn outdated_among<'a>(
    candidates: impl Iterator<Item = &'a InstalledPlugin>,
    available: &[AvailablePlugin],
) -> Vec<OutdatedEntry> {
    let offered: HashMap<&str, &AvailablePlugin> =
        available.iter().map(|p| (p.id.as_str(), p)).collect();

    candidates
        .filter_map(|plugin| {
            let offer = offered.get(plugin.id.as_str())?;
            if plugin.version.is_empty() || offer.version.is_empty() {
                return None;
            }
            (compare_versions(&plugin.version, &offer.version) == Ordering::Less).then(|| {
                OutdatedEntry {
                    id: plugin.id.clone(),
                    installed_version: plugin.version.clone(),
                    available_version: offer.version.clone(),
                    scope: plugin.scope,
                }
            })
        })
        .collect()
}
