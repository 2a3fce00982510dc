//! Everything a command needs to know about where it runs

use std::path::Path;

use fettle_config::{DirProfileStore, FettlePaths, GlobalConfig, ProjectConfig, ProjectContext};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub project: ProjectContext,
    pub paths: FettlePaths,
}

/// State of the project's `.claude/fettle.toml`.
#[derive(Debug)]
pub enum ConfigState {
    Missing,
    Invalid(fettle_config::Error),
    Loaded(ProjectConfig),
}

impl AppContext {
    /// Discover the project from `cwd` and the homes from the environment.
    pub fn discover(cwd: &Path) -> Result<Self> {
        Ok(Self {
            project: ProjectContext::discover(cwd),
            paths: FettlePaths::from_env()?,
        })
    }

    /// A context for a known project root.
    #[cfg(test)]
    pub fn for_project(root: impl Into<std::path::PathBuf>, paths: FettlePaths) -> Self {
        let root = root.into();
        let config_path = fettle_config::find_config_path(&root);
        Self {
            project: ProjectContext { root, config_path },
            paths,
        }
    }

    pub fn root(&self) -> &Path {
        &self.project.root
    }

    pub fn profile_store(&self) -> DirProfileStore {
        DirProfileStore::new(self.paths.profiles_dir())
    }

    pub fn global_config(&self) -> GlobalConfig {
        GlobalConfig::load(&self.paths.global_config_path())
    }

    pub fn load_config(&self) -> ConfigState {
        match &self.project.config_path {
            None => ConfigState::Missing,
            Some(path) => match ProjectConfig::load(path) {
                Ok(config) => ConfigState::Loaded(config),
                Err(e) => ConfigState::Invalid(e),
            },
        }
    }
}
