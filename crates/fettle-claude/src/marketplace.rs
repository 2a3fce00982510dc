//! Marketplace discovery and bootstrapping
//!
//! Claude clones each marketplace into its own directory:
//!
//! ```text
//! <claude-home>/plugins/marketplaces/
//!     my-marketplace/
//!         .claude-plugin/marketplace.json
//! ```
//!
//! The directory name, not the manifest's `name`, is the marketplace half
//! of a plugin id.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use fettle_core::AvailablePlugin;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::actions::PluginActions;
use crate::error::Result;

static GITHUB_REPO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([^/]+/[^/.]+)").unwrap());

#[derive(Debug, Deserialize)]
struct MarketplaceManifest {
    #[serde(default)]
    plugins: Vec<ManifestPlugin>,
}

#[derive(Debug, Deserialize)]
struct ManifestPlugin {
    name: String,
    #[serde(default)]
    version: String,
}

/// A marketplace as reported by `claude plugin marketplace list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledMarketplace {
    pub name: String,
    /// `github`, `git`, or another source kind
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub install_location: Option<PathBuf>,
}

/// `<dir>/<marketplace>/.claude-plugin/marketplace.json`
pub fn manifest_path(marketplaces_dir: &Path, marketplace: &str) -> PathBuf {
    marketplaces_dir
        .join(marketplace)
        .join(".claude-plugin")
        .join("marketplace.json")
}

/// Names of the marketplace directories, sorted.
pub fn installed_marketplaces(marketplaces_dir: &Path) -> Result<Vec<String>> {
    if !marketplaces_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = std::fs::read_dir(marketplaces_dir)?
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// Every plugin offered by the locally cloned marketplaces.
///
/// Marketplaces without a manifest, or with one that does not parse, are
/// skipped.
pub fn list_available_plugins(marketplaces_dir: &Path) -> Result<Vec<AvailablePlugin>> {
    let mut available = Vec::new();

    for marketplace in installed_marketplaces(marketplaces_dir)? {
        let path = manifest_path(marketplaces_dir, &marketplace);
        if !path.is_file() {
            continue;
        }

        let manifest = std::fs::read_to_string(&path)
            .map_err(crate::ClaudeError::from)
            .and_then(|content| Ok(serde_json::from_str::<MarketplaceManifest>(&content)?));

        match manifest {
            Ok(manifest) => {
                tracing::debug!(
                    marketplace = %marketplace,
                    plugins = manifest.plugins.len(),
                    "Read marketplace manifest"
                );
                available.extend(manifest.plugins.into_iter().map(|plugin| AvailablePlugin {
                    id: format!("{}@{}", plugin.name, marketplace),
                    version: plugin.version,
                    marketplace: marketplace.clone(),
                }));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping malformed marketplace manifest");
            }
        }
    }

    Ok(available)
}

/// Extract `owner/repo` from a GitHub URL, with or without `.git`.
///
/// ```
/// use fettle_claude::marketplace::normalize_github_source;
///
/// assert_eq!(
///     normalize_github_source("https://github.com/acme/plugins.git").as_deref(),
///     Some("acme/plugins")
/// );
/// assert_eq!(normalize_github_source("https://gitlab.com/acme/plugins"), None);
/// ```
pub fn normalize_github_source(source: &str) -> Option<String> {
    GITHUB_REPO
        .captures(source)
        .map(|caps| caps[1].to_string())
}

/// Whether `source` is already registered under any name.
///
/// GitHub marketplaces match on `owner/repo`, plain git ones on the exact URL.
pub fn is_marketplace_source_installed(installed: &[InstalledMarketplace], source: &str) -> bool {
    let normalized = normalize_github_source(source);

    installed.iter().any(|m| match m.source.as_str() {
        "github" => match (&m.repo, &normalized) {
            (Some(repo), Some(wanted)) => repo == wanted,
            _ => false,
        },
        "git" => m.url.as_deref() == Some(source),
        _ => false,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of [`ensure_marketplaces`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsureMarketplacesResult {
    pub added: Vec<String>,
    pub already_installed: Vec<String>,
    pub failed: Vec<MarketplaceFailure>,
}

/// Add every configured marketplace that is not installed yet.
///
/// A marketplace counts as installed when its directory exists or when its
/// source is already registered under another name. Registered marketplaces
/// are only listed once a configured one is missing on disk. Failures are
/// collected per marketplace; the remaining ones are still attempted.
pub fn ensure_marketplaces<A: PluginActions + ?Sized>(
    configured: &IndexMap<String, String>,
    marketplaces_dir: &Path,
    actions: &A,
) -> EnsureMarketplacesResult {
    let mut result = EnsureMarketplacesResult::default();
    let mut registered: Option<Vec<InstalledMarketplace>> = None;

    for (name, source) in configured {
        if marketplaces_dir.join(name).exists() {
            result.already_installed.push(name.clone());
            continue;
        }

        let registered = registered.get_or_insert_with(|| actions.registered_marketplaces());
        if is_marketplace_source_installed(registered, source) {
            tracing::debug!(marketplace = %name, %source, "Source already registered");
            result.already_installed.push(name.clone());
            continue;
        }

        tracing::debug!(marketplace = %name, %source, "Adding marketplace");
        match actions.add_marketplace(source) {
            Ok(()) => result.added.push(name.clone()),
            Err(e) => result.failed.push(MarketplaceFailure {
                name: name.clone(),
                error: e.to_string(),
            }),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, marketplace: &str, content: &str) {
        let path = manifest_path(dir, marketplace);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_dir_has_no_plugins() {
        let temp = TempDir::new().unwrap();
        let result = list_available_plugins(&temp.path().join("marketplaces")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_plugins_are_keyed_by_directory_name() {
        let temp = TempDir::new().unwrap();
        write_manifest(
            temp.path(),
            "my-marketplace",
            r#"{"name": "Something Else", "plugins": [
                {"name": "plugin-a", "version": "1.0.0", "source": "./plugins/plugin-a"},
                {"name": "plugin-b", "version": "2.1.0", "source": {"source": "url", "url": "https://x"}}
            ]}"#,
        );

        let result = list_available_plugins(temp.path()).unwrap();
        assert_eq!(
            result,
            vec![
                AvailablePlugin {
                    id: "plugin-a@my-marketplace".to_string(),
                    version: "1.0.0".to_string(),
                    marketplace: "my-marketplace".to_string(),
                },
                AvailablePlugin {
                    id: "plugin-b@my-marketplace".to_string(),
                    version: "2.1.0".to_string(),
                    marketplace: "my-marketplace".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_bad_manifests_are_skipped() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), "a-broken", "{ not json");
        fs::create_dir_all(temp.path().join("b-no-manifest")).unwrap();
        write_manifest(
            temp.path(),
            "c-good",
            r#"{"plugins": [{"name": "foo", "version": "1.0.0"}]}"#,
        );

        let ids: Vec<String> = list_available_plugins(temp.path())
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["foo@c-good"]);
    }

    #[test]
    fn test_installed_marketplaces_ignores_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("beta")).unwrap();
        fs::create_dir_all(temp.path().join("alpha")).unwrap();
        fs::write(temp.path().join("known_marketplaces.json"), "{}").unwrap();

        assert_eq!(installed_marketplaces(temp.path()).unwrap(), vec!["alpha", "beta"]);
    }

    #[rstest]
    #[case("https://github.com/owner/repo", Some("owner/repo"))]
    #[case("https://github.com/owner/repo.git", Some("owner/repo"))]
    #[case("git@github.com/owner/repo", Some("owner/repo"))]
    #[case("https://example.com/owner/repo", None)]
    fn test_normalize_github_source(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_github_source(source).as_deref(), expected);
    }

    fn marketplace(source: &str, repo: Option<&str>, url: Option<&str>) -> InstalledMarketplace {
        InstalledMarketplace {
            name: "m".to_string(),
            source: source.to_string(),
            repo: repo.map(str::to_string),
            url: url.map(str::to_string),
            install_location: None,
        }
    }

    #[test]
    fn test_source_installed_matches_github_repo() {
        let installed = vec![marketplace("github", Some("owner/repo"), None)];
        assert!(is_marketplace_source_installed(&installed, "https://github.com/owner/repo.git"));
        assert!(!is_marketplace_source_installed(&installed, "https://github.com/owner/other"));
    }

    #[test]
    fn test_source_installed_matches_git_url_exactly() {
        let installed = vec![marketplace("git", None, Some("https://git.example.com/r.git"))];
        assert!(is_marketplace_source_installed(&installed, "https://git.example.com/r.git"));
        assert!(!is_marketplace_source_installed(&installed, "https://git.example.com/r"));
    }

    #[test]
    fn test_source_installed_parses_cli_json() {
        let json = r#"[{"name": "m", "source": "github", "repo": "o/r", "installLocation": "/x"}]"#;
        let installed: Vec<InstalledMarketplace> = serde_json::from_str(json).unwrap();
        assert!(is_marketplace_source_installed(&installed, "https://github.com/o/r"));
    }

    #[derive(Default)]
    struct Recorder {
        registered: Vec<InstalledMarketplace>,
        adds: RefCell<Vec<String>>,
        listings: RefCell<usize>,
    }

    impl PluginActions for Recorder {
        type Error = std::io::Error;

        fn install(&self, _id: &str) -> std::io::Result<()> {
            Ok(())
        }

        fn update(&self, _id: &str, _scope: fettle_core::Scope) -> std::io::Result<()> {
            Ok(())
        }

        fn refresh_marketplaces(&self) -> std::io::Result<()> {
            Ok(())
        }

        fn add_marketplace(&self, source: &str) -> std::io::Result<()> {
            self.adds.borrow_mut().push(source.to_string());
            if source.contains("broken") {
                return Err(std::io::Error::other("clone failed"));
            }
            Ok(())
        }

        fn registered_marketplaces(&self) -> Vec<InstalledMarketplace> {
            *self.listings.borrow_mut() += 1;
            self.registered.clone()
        }
    }

    fn configured(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(name, source)| (name.to_string(), source.to_string()))
            .collect()
    }

    #[test]
    fn test_ensure_adds_missing_and_keeps_going_after_failure() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("present")).unwrap();
        let actions = Recorder::default();

        let result = ensure_marketplaces(
            &configured(&[
                ("present", "https://github.com/acme/present"),
                ("bad", "https://github.com/acme/broken"),
                ("fresh", "https://github.com/acme/fresh"),
            ]),
            temp.path(),
            &actions,
        );

        assert_eq!(result.already_installed, vec!["present"]);
        assert_eq!(result.added, vec!["fresh"]);
        assert_eq!(
            result.failed,
            vec![MarketplaceFailure {
                name: "bad".to_string(),
                error: "clone failed".to_string(),
            }]
        );
    }

    #[test]
    fn test_ensure_skips_source_registered_under_another_name() {
        let temp = TempDir::new().unwrap();
        let actions = Recorder {
            registered: vec![marketplace("github", Some("acme/tools"), None)],
            ..Recorder::default()
        };

        let result = ensure_marketplaces(
            &configured(&[
                ("tools", "https://github.com/acme/tools.git"),
                ("extra", "https://github.com/acme/extra"),
            ]),
            temp.path(),
            &actions,
        );

        assert_eq!(result.already_installed, vec!["tools"]);
        assert_eq!(result.added, vec!["extra"]);
        assert_eq!(*actions.adds.borrow(), vec!["https://github.com/acme/extra"]);
        assert_eq!(*actions.listings.borrow(), 1);
    }

    #[test]
    fn test_ensure_does_not_list_when_all_directories_exist() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("reg")).unwrap();
        let actions = Recorder::default();

        let result = ensure_marketplaces(
            &configured(&[("reg", "https://github.com/acme/reg")]),
            temp.path(),
            &actions,
        );

        assert_eq!(result.already_installed, vec!["reg"]);
        assert_eq!(*actions.listings.borrow(), 0);
    }
}
