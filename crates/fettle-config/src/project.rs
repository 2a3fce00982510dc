//! Project configuration parsing for `.claude/fettle.toml`
//!
//! ```toml
//! profiles = ["backend"]
//! plugins = [
//!     "git@my-marketplace",
//!     "lint@my-marketplace >= 1.2.0",
//! ]
//! ```

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Path of the project config relative to the project root.
pub const PROJECT_CONFIG_PATH: &str = ".claude/fettle.toml";

/// Declared plugins and profiles of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    /// Raw plugin lines, parsed later by the resolver.
    pub plugins: Vec<String>,
    /// Profiles to include, in order.
    pub profiles: Vec<String>,
}

impl ProjectConfig {
    /// Parse a project config document.
    ///
    /// Missing keys and non-string entries are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use fettle_config::ProjectConfig;
    ///
    /// let config = ProjectConfig::parse(r#"plugins = ["git@reg", 3]"#).unwrap();
    /// assert_eq!(config.plugins, vec!["git@reg"]);
    /// assert!(config.profiles.is_empty());
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        Ok(Self {
            plugins: string_array(&table, "plugins"),
            profiles: string_array(&table, "profiles"),
        })
    }

    /// Read and parse the config at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let config = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            plugins = config.plugins.len(),
            profiles = config.profiles.len(),
            "Loaded project config"
        );
        Ok(config)
    }
}

/// Collect the string entries of an array-valued key.
pub(crate) fn string_array(table: &toml::Table, key: &str) -> Vec<String> {
    match table.get(key) {
        Some(toml::Value::Array(items)) => items
            .iter()
            .filter_map(toml::Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
