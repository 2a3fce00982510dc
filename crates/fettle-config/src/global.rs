//! Global fettle configuration (`<fettle-home>/config.toml`)
//!
//! ```toml
//! [marketplaces]
//! pickled-claude-plugins = "https://github.com/technicalpickles/pickled-claude-plugins"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Marketplace name to source URL, in file order.
    #[serde(default)]
    pub marketplaces: IndexMap<String, String>,
}

impl GlobalConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read the global config, treating a missing or malformed file as empty.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read global config");
                return Self::default();
            }
        };

        Self::parse(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed global config");
            Self::default()
        })
    }
}
