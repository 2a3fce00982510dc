//! Plugin resolution and reconciliation engine for fettle.
//!
//! Turns layered plugin configuration into a desired set and compares it
//! with what is installed:
//!
//! - **Constraint parsing**: `name@marketplace >= 1.2.0` lines
//! - **Version comparison**: numeric, dot-separated, padded with zeros
//! - **Profile resolution**: default, explicit and project layers with provenance
//! - **Diffing**: missing / present / extra for one project's local installs
//! - **Outdated detection**: installed versions against a marketplace snapshot
//!
//! Everything here is pure. Reading files and calling the `claude` CLI
//! happen in `fettle-config` and `fettle-claude`; results come in as plain
//! data and problems go out as values, never as early returns.
//!
//! ```text
//!  config lines --> ProfileResolver --> Resolution --> diff_plugins --> PluginDiff
//!                        |                                  ^               |
//!                   ProfileStore                  PluginInventory::list     v
//!                                                              find_outdated (list_available)
//! ```

pub mod constraint;
pub mod diff;
pub mod error;
pub mod inventory;
pub mod outdated;
pub mod profile;
pub mod version;

pub use constraint::{ParsedPluginList, PluginReference, parse_plugin_list, parse_plugin_ref};
pub use diff::{InstalledPlugin, PluginDiff, PresentPlugin, Scope, diff_plugins};
pub use error::{ParseFailure, ResolutionError};
pub use inventory::PluginInventory;
pub use outdated::{AvailablePlugin, OutdatedEntry, find_outdated, find_outdated_installed};
pub use profile::{
    ConstraintOverride, DEFAULT_PROFILE, PROJECT_SOURCE, ProfileResolver, ProfileStore,
    Resolution, ResolvedPlugin, resolve_profiles,
};
pub use version::{compare_versions, is_valid_version, merge_constraints, satisfies};
