//! Location of fettle's and Claude's configuration directories
//!
//! - Fettle home: `$FETTLE_CONFIG_HOME`, else `~/.config/fettle`
//! - Claude home: `$CLAUDE_CONFIG_DIR`, else `~/.claude`
//!
//! Empty environment variables count as unset.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const FETTLE_CONFIG_HOME_ENV: &str = "FETTLE_CONFIG_HOME";
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Resolved base directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FettlePaths {
    claude_home: PathBuf,
    fettle_home: PathBuf,
    claude_home_overridden: bool,
}

impl FettlePaths {
    /// Explicit directories. The Claude home counts as custom and is handed
    /// to child processes.
    pub fn new(claude_home: impl Into<PathBuf>, fettle_home: impl Into<PathBuf>) -> Self {
        Self {
            claude_home: claude_home.into(),
            fettle_home: fettle_home.into(),
            claude_home_overridden: true,
        }
    }

    /// Resolve from the process environment and the user's home directory.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var_os(key), dirs::home_dir())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F, home: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let claude_override = var(CLAUDE_CONFIG_DIR_ENV);
        let claude_home_overridden = claude_override.is_some();

        let claude_home = match claude_override {
            Some(dir) => dir,
            None => home.as_ref().ok_or(Error::HomeNotFound)?.join(".claude"),
        };
        let fettle_home = match var(FETTLE_CONFIG_HOME_ENV) {
            Some(dir) => dir,
            None => home
                .as_ref()
                .ok_or(Error::HomeNotFound)?
                .join(".config")
                .join("fettle"),
        };

        Ok(Self {
            claude_home,
            fettle_home,
            claude_home_overridden,
        })
    }

    pub fn claude_home(&self) -> &Path {
        &self.claude_home
    }

    pub fn fettle_home(&self) -> &Path {
        &self.fettle_home
    }

    /// The Claude home when it differs from Claude's own default.
    pub fn custom_claude_home(&self) -> Option<&Path> {
        self.claude_home_overridden.then_some(self.claude_home.as_path())
    }

    /// `<fettle-home>/profiles`
    pub fn profiles_dir(&self) -> PathBuf {
        self.fettle_home.join("profiles")
    }

    /// `<fettle-home>/config.toml`
    pub fn global_config_path(&self) -> PathBuf {
        self.fettle_home.join("config.toml")
    }

    /// `<claude-home>/plugins`
    pub fn plugins_dir(&self) -> PathBuf {
        self.claude_home.join("plugins")
    }

    /// `<claude-home>/plugins/marketplaces`
    pub fn marketplaces_dir(&self) -> PathBuf {
        self.plugins_dir().join("marketplaces")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[rstest]
    #[case::defaults(&[], "/home/u/.claude", None)]
    #[case::empty_counts_as_unset(&[("CLAUDE_CONFIG_DIR", "")], "/home/u/.claude", None)]
    #[case::override_is_custom(&[("CLAUDE_CONFIG_DIR", "/tmp/claude")], "/tmp/claude", Some("/tmp/claude"))]
    #[case::unrelated_vars_ignored(&[("FETTLE_CONFIG_HOME", "/tmp/f")], "/home/u/.claude", None)]
    fn test_claude_home_resolution(
        #[case] env: &[(&str, &str)],
        #[case] expected: &str,
        #[case] custom: Option<&str>,
    ) {
        let paths = FettlePaths::from_vars(vars(env), Some(PathBuf::from("/home/u"))).unwrap();

        assert_eq!(paths.claude_home(), Path::new(expected));
        assert_eq!(paths.custom_claude_home(), custom.map(Path::new));
    }

    #[rstest]
    #[case::defaults(&[], "/home/u/.config/fettle")]
    #[case::empty_counts_as_unset(&[("FETTLE_CONFIG_HOME", "")], "/home/u/.config/fettle")]
    #[case::override_wins(&[("FETTLE_CONFIG_HOME", "/tmp/fettle")], "/tmp/fettle")]
    fn test_fettle_home_resolution(#[case] env: &[(&str, &str)], #[case] expected: &str) {
        let paths = FettlePaths::from_vars(vars(env), Some(PathBuf::from("/home/u"))).unwrap();
        assert_eq!(paths.fettle_home(), Path::new(expected));
    }

    #[test]
    fn test_env_overrides() {
        let paths = FettlePaths::from_vars(
            vars(&[("CLAUDE_CONFIG_DIR", "/tmp/claude"), ("FETTLE_CONFIG_HOME", "/tmp/fettle")]),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();

        assert_eq!(paths.custom_claude_home(), Some(Path::new("/tmp/claude")));
        assert_eq!(paths.profiles_dir(), PathBuf::from("/tmp/fettle/profiles"));
        assert_eq!(paths.global_config_path(), PathBuf::from("/tmp/fettle/config.toml"));
        assert_eq!(
            paths.marketplaces_dir(),
            PathBuf::from("/tmp/claude/plugins/marketplaces")
        );
    }

    #[test]
    fn test_no_home_without_overrides_fails() {
        let result = FettlePaths::from_vars(vars(&[]), None);
        assert!(matches!(result, Err(Error::HomeNotFound)));

        let result = FettlePaths::from_vars(
            vars(&[("CLAUDE_CONFIG_DIR", "/c"), ("FETTLE_CONFIG_HOME", "/f")]),
            None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_new_is_custom() {
        let paths = FettlePaths::new("/c", "/f");
        assert_eq!(paths.custom_claude_home(), Some(Path::new("/c")));
    }
}
