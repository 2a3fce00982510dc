//! Desired-versus-installed comparison
//!
//! Only plugins installed at local scope for the project being evaluated
//! take part. User-wide and global installs, and local installs belonging to
//! other projects, are invisible to the diff.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::profile::ResolvedPlugin;
use crate::version::satisfies;

/// Where an installed plugin is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Bound to a single project path
    Local,
    /// Active for the current user everywhere
    User,
    Global,
    /// Any scope this engine does not know about
    #[serde(other)]
    Other,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::User => "user",
            Scope::Global => "global",
            Scope::Other => "other",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plugin as reported by the installed inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledPlugin {
    pub id: String,
    #[serde(default)]
    pub version: String,
    pub scope: Scope,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<PathBuf>,
}

impl InstalledPlugin {
    /// Whether this install is local to the given project.
    ///
    /// Paths are compared component-wise, so `/p/` and `/p` name the same
    /// project. No canonicalisation happens: symlinked and relative paths
    /// only match when spelled the same way.
    pub fn is_local_to(&self, project_path: &Path) -> bool {
        self.scope == Scope::Local && self.project_path.as_deref() == Some(project_path)
    }
}

/// A desired plugin that is installed, carrying its provenance along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentPlugin {
    #[serde(flatten)]
    pub installed: InstalledPlugin,
    pub source: String,
    pub constraint: Option<String>,
}

impl PresentPlugin {
    pub fn id(&self) -> &str {
        &self.installed.id
    }

    pub fn version(&self) -> &str {
        &self.installed.version
    }

    /// Whether the installed version meets the resolved lower bound.
    pub fn satisfies_constraint(&self) -> bool {
        satisfies(&self.installed.version, self.constraint.as_deref())
    }
}

/// Classification of the desired set against one project's installs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDiff {
    /// Desired but not installed, in desired order.
    pub missing: Vec<ResolvedPlugin>,
    /// Desired and installed, in desired order.
    pub present: Vec<PresentPlugin>,
    /// Installed locally but not desired, in inventory order.
    pub extra: Vec<InstalledPlugin>,
}

impl PluginDiff {
    /// True when nothing desired is missing.
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }

    /// Present plugins whose installed version is below the resolved constraint.
    pub fn unsatisfied(&self) -> impl Iterator<Item = &PresentPlugin> {
        self.present.iter().filter(|p| !p.satisfies_constraint())
    }
}

/// Compare the desired set with the inventory for `project_path`.
pub fn diff_plugins(
    desired: &[ResolvedPlugin],
    installed: &[InstalledPlugin],
    project_path: &Path,
) -> PluginDiff {
    let mut local: IndexMap<&str, &InstalledPlugin> = IndexMap::new();
    for plugin in installed.iter().filter(|p| p.is_local_to(project_path)) {
        local.entry(plugin.id.as_str()).or_insert(plugin);
    }

    tracing::debug!(
        project = %project_path.display(),
        desired = desired.len(),
        local = local.len(),
        total = installed.len(),
        "Diffing plugins"
    );

    let mut diff = PluginDiff::default();

    for wanted in desired {
        match local.get(wanted.id.as_str()) {
            Some(found) => diff.present.push(PresentPlugin {
                installed: (*found).clone(),
                source: wanted.source.clone(),
                constraint: wanted.constraint.clone(),
            }),
            None => diff.missing.push(wanted.clone()),
        }
    }

    let desired_ids: HashSet<&str> = desired.iter().map(|p| p.id.as_str()).collect();
    diff.extra = installed
        .iter()
        .filter(|p| p.is_local_to(project_path) && !desired_ids.contains(p.id.as_str()))
        .cloned()
        .collect();

    diff
}
