//! Profile store backed by a directory of `<name>.toml` files
//!
//! Each profile file uses the same `plugins = [..]` array as the project
//! config. Other keys are ignored.

use std::path::{Path, PathBuf};

use fettle_core::ProfileStore;

use crate::error::{Error, Result};
use crate::project::string_array;

#[derive(Debug, Clone)]
pub struct DirProfileStore {
    dir: PathBuf,
}

impl DirProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.toml"))
    }

    /// Plugin lines of the named profile, `None` when it does not exist.
    pub fn load(&self, name: &str) -> Result<Option<Vec<String>>> {
        let path = self.profile_path(name);
        if !path.is_file() {
            tracing::debug!(profile = name, path = %path.display(), "Profile file not found");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::read(&path, e))?;
        let table: toml::Table = toml::from_str(&content)?;
        Ok(Some(string_array(&table, "plugins")))
    }

    /// Names of all profiles in the directory, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| Error::read(&self.dir, e))?;
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}

impl ProfileStore for DirProfileStore {
    type Error = Error;

    fn load(&self, name: &str) -> std::result::Result<Option<Vec<String>>, Self::Error> {
        DirProfileStore::load(self, name)
    }
}
