//! Profile resolution with layered precedence
//!
//! The desired plugin set for a project is assembled from up to three kinds
//! of layers, processed in a fixed order:
//!
//! 1. The implicit `default` profile, when the store has one
//! 2. Each profile the project lists explicitly, in listed order
//! 3. The project's own inline plugin list
//!
//! The first layer to mention a plugin is credited as its source. Later
//! layers can only tighten its constraint: the highest lower bound wins.
//! When that leaves the project's own constraint behind, the resolver
//! records a [`ConstraintOverride`] so the user can see why.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use fettle_core::profile::ProfileResolver;
//!
//! let mut store = HashMap::new();
//! store.insert("default".to_string(), vec!["git@reg".to_string()]);
//!
//! let profiles: Vec<String> = Vec::new();
//! let plugins = vec!["git@reg".to_string(), "lint@reg >= 1.0".to_string()];
//!
//! let resolution = ProfileResolver::new(&store).resolve(&profiles, &plugins);
//! assert!(resolution.is_ok());
//! assert_eq!(resolution.plugins[0].source, "default");
//! assert_eq!(resolution.plugins[1].source, "project");
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::hash::BuildHasher;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::constraint::{PluginReference, parse_plugin_ref};
use crate::error::ResolutionError;
use crate::version::{compare_versions, merge_constraints};

/// Name of the profile that is loaded for every project when it exists.
pub const DEFAULT_PROFILE: &str = "default";

/// Source tag for plugins declared in the project's own configuration.
pub const PROJECT_SOURCE: &str = "project";

/// Lookup of named profiles.
///
/// `Ok(None)` means the profile does not exist. Errors are reserved for
/// profiles that exist but cannot be read.
pub trait ProfileStore {
    type Error: std::error::Error;

    /// Return the raw plugin lines of the named profile.
    fn load(&self, name: &str) -> Result<Option<Vec<String>>, Self::Error>;
}

impl<T: ProfileStore + ?Sized> ProfileStore for &T {
    type Error = T::Error;

    fn load(&self, name: &str) -> Result<Option<Vec<String>>, Self::Error> {
        (**self).load(name)
    }
}

impl<S: BuildHasher> ProfileStore for HashMap<String, Vec<String>, S> {
    type Error = Infallible;

    fn load(&self, name: &str) -> Result<Option<Vec<String>>, Self::Error> {
        Ok(self.get(name).cloned())
    }
}

impl ProfileStore for BTreeMap<String, Vec<String>> {
    type Error = Infallible;

    fn load(&self, name: &str) -> Result<Option<Vec<String>>, Self::Error> {
        Ok(self.get(name).cloned())
    }
}

/// A plugin in the desired set, with the layer that introduced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPlugin {
    pub id: String,
    /// `"project"` or the name of the profile that first listed this id.
    pub source: String,
    /// Effective minimum version after merging every layer.
    pub constraint: Option<String>,
}

/// Diagnostic emitted when another layer's constraint beat the project's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintOverride {
    pub plugin_id: String,
    pub project_constraint: String,
    pub winning_constraint: String,
    pub winning_source: String,
}

/// Output of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Deduplicated desired set, in precedence order.
    pub plugins: Vec<ResolvedPlugin>,
    /// Every problem encountered. Never fail-fast.
    pub errors: Vec<ResolutionError>,
    pub constraint_overrides: Vec<ConstraintOverride>,
}

impl Resolution {
    /// True when no resolution errors were collected.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors rendered as user-facing messages.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedPlugin> {
        self.plugins.iter().find(|p| p.id == id)
    }
}

/// Layers profiles and project plugins into a [`Resolution`].
pub struct ProfileResolver<'a, S: ProfileStore> {
    store: &'a S,
}

impl<'a, S: ProfileStore> ProfileResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve the desired set for a project.
    ///
    /// `profiles` are the profile names the project includes explicitly and
    /// `plugins` its inline plugin lines.
    pub fn resolve<P, L>(&self, profiles: &[P], plugins: &[L]) -> Resolution
    where
        P: AsRef<str>,
        L: AsRef<str>,
    {
        let mut layers = Layers::default();

        match self.store.load(DEFAULT_PROFILE) {
            Ok(Some(lines)) => {
                tracing::debug!(count = lines.len(), "Loading default profile");
                layers.apply(DEFAULT_PROFILE, &lines);
            }
            Ok(None) => tracing::debug!("No default profile, skipping"),
            Err(e) => layers.errors.push(ResolutionError::ProfileUnreadable {
                name: DEFAULT_PROFILE.to_string(),
                reason: e.to_string(),
            }),
        }

        for name in profiles {
            let name = name.as_ref();
            match self.store.load(name) {
                Ok(Some(lines)) => {
                    tracing::debug!(profile = name, count = lines.len(), "Loading profile");
                    layers.apply(name, &lines);
                }
                Ok(None) => layers
                    .errors
                    .push(ResolutionError::ProfileNotFound(name.to_string())),
                Err(e) => layers.errors.push(ResolutionError::ProfileUnreadable {
                    name: name.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        layers.apply(PROJECT_SOURCE, plugins);
        layers.finish()
    }
}

/// Resolve with a one-off [`ProfileResolver`].
pub fn resolve_profiles<S, P, L>(store: &S, profiles: &[P], plugins: &[L]) -> Resolution
where
    S: ProfileStore,
    P: AsRef<str>,
    L: AsRef<str>,
{
    ProfileResolver::new(store).resolve(profiles, plugins)
}

/// Accumulated state while layers are applied.
///
/// Ordered maps keep output order equal to first-encounter order.
#[derive(Default)]
struct Layers {
    plugins: IndexMap<String, ResolvedPlugin>,
    /// Highest constraint the project itself declared, per id.
    project_constraints: HashMap<String, String>,
    overrides: IndexMap<String, ConstraintOverride>,
    errors: Vec<ResolutionError>,
}

impl Layers {
    fn apply<L: AsRef<str>>(&mut self, source: &str, lines: &[L]) {
        for line in lines {
            match parse_plugin_ref(line.as_ref()) {
                Ok(reference) => self.insert(source, reference),
                Err(failure) => self.errors.push(failure.into()),
            }
        }
    }

    fn insert(&mut self, source: &str, reference: PluginReference) {
        let PluginReference { id, constraint } = reference;
        let from_project = source == PROJECT_SOURCE;

        if from_project {
            let own = self.project_constraints.get(&id).map(String::as_str);
            if let Some(own) = merge_constraints(own, constraint.as_deref()).map(str::to_string) {
                self.project_constraints.insert(id.clone(), own);
            }
        }

        let entry = match self.plugins.entry(id) {
            Entry::Vacant(slot) => {
                let id = slot.key().clone();
                slot.insert(ResolvedPlugin {
                    id,
                    source: source.to_string(),
                    constraint,
                });
                return;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        let merged = merge_constraints(entry.constraint.as_deref(), constraint.as_deref())
            .map(str::to_string);
        entry.constraint = merged;

        if !from_project || entry.source == PROJECT_SOURCE {
            return;
        }

        let (Some(own), Some(winning)) = (
            self.project_constraints.get(&entry.id),
            entry.constraint.as_deref(),
        ) else {
            return;
        };

        if compare_versions(winning, own) != Ordering::Greater {
            self.overrides.shift_remove(&entry.id);
            return;
        }

        tracing::debug!(
            plugin = %entry.id,
            project = %own,
            winning = %winning,
            source = %entry.source,
            "Project constraint overridden"
        );
        self.overrides.insert(
            entry.id.clone(),
            ConstraintOverride {
                plugin_id: entry.id.clone(),
                project_constraint: own.clone(),
                winning_constraint: winning.to_string(),
                winning_source: entry.source.clone(),
            },
        );
    }

    fn finish(self) -> Resolution {
        Resolution {
            plugins: self.plugins.into_values().collect(),
            errors: self.errors,
            constraint_overrides: self.overrides.into_values().collect(),
        }
    }
}
