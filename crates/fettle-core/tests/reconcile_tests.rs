//! End-to-end tests for the resolve -> diff -> outdated pipeline

use fettle_core::{
    AvailablePlugin, InstalledPlugin, ResolutionError, Scope, diff_plugins, find_outdated,
    resolve_profiles,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const PROJECT: &str = "/work/app";

fn profiles(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(name, lines)| (name.to_string(), lines.iter().map(|l| l.to_string()).collect()))
        .collect()
}

fn local(id: &str, version: &str) -> InstalledPlugin {
    InstalledPlugin {
        id: id.to_string(),
        version: version.to_string(),
        scope: Scope::Local,
        enabled: true,
        project_path: Some(PathBuf::from(PROJECT)),
    }
}

fn offer(id: &str, version: &str) -> AvailablePlugin {
    AvailablePlugin {
        id: id.to_string(),
        version: version.to_string(),
        marketplace: id.split('@').nth(1).unwrap_or_default().to_string(),
    }
}

// ==========================================================================
// Resolution properties
// ==========================================================================

mod resolution {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_desired_set_has_unique_ids() {
        let store = profiles(&[
            ("default", &["a@m", "b@m"]),
            ("team", &["b@m >= 1", "c@m"]),
        ]);
        let result = resolve_profiles(&store, &["team", "team"], &["a@m", "c@m >= 2", "d@m"]);

        let mut ids: Vec<&str> = result.plugins.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a@m", "b@m", "c@m", "d@m"]);
        ids.dedup();
        assert_eq!(ids.len(), result.plugins.len());
    }

    #[test]
    fn test_constraint_is_maximum_across_layers() {
        let store = profiles(&[
            ("default", &["a@m >= 1.5"]),
            ("one", &["a@m >= 1.10"]),
            ("two", &["a@m >= 1.9"]),
        ]);
        let result = resolve_profiles(&store, &["one", "two"], &["a@m >= 1.2"]);

        let resolved = result.get("a@m").unwrap();
        assert_eq!(resolved.constraint.as_deref(), Some("1.10"));
        assert_eq!(resolved.source, "default");
    }

    #[test]
    fn test_explicit_default_is_harmless() {
        let store = profiles(&[("default", &["a@m"])]);
        let result = resolve_profiles(&store, &["default"], &[] as &[&str]);

        assert!(result.is_ok());
        assert_eq!(result.plugins.len(), 1);
    }

    #[test]
    fn test_errors_never_short_circuit() {
        let store = profiles(&[]);
        let result = resolve_profiles(&store, &["nope"], &["x@m < 1", "y@m"]);

        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.errors[0], ResolutionError::ProfileNotFound(_)));
        assert!(matches!(result.errors[1], ResolutionError::InvalidReference(_)));
        assert_eq!(result.plugins.len(), 1);
    }
}

// ==========================================================================
// Full pipeline
// ==========================================================================

#[test]
fn test_pipeline_classifies_every_plugin() {
    let store = profiles(&[("default", &["lint@m >= 2.0", "fmt@m"])]);
    let resolution = resolve_profiles(&store, &[] as &[&str], &["lint@m >= 1.0", "docs@m"]);

    let installed = vec![
        local("lint@m", "1.5.0"),
        local("fmt@m", "3.0.0"),
        local("stray@m", "0.1.0"),
        InstalledPlugin {
            scope: Scope::User,
            project_path: None,
            ..local("docs@m", "1.0.0")
        },
    ];
    let available = vec![offer("lint@m", "2.1.0"), offer("fmt@m", "3.0.0")];

    let diff = diff_plugins(&resolution.plugins, &installed, Path::new(PROJECT));

    let missing: Vec<&str> = diff.missing.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(missing, vec!["docs@m"]);
    let present: Vec<&str> = diff.present.iter().map(|p| p.id()).collect();
    assert_eq!(present, vec!["lint@m", "fmt@m"]);
    let extra: Vec<&str> = diff.extra.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(extra, vec!["stray@m"]);

    let unsatisfied: Vec<&str> = diff.unsatisfied().map(|p| p.id()).collect();
    assert_eq!(unsatisfied, vec!["lint@m"]);

    let outdated = find_outdated(&diff.present, &available);
    assert_eq!(outdated.len(), 1);
    assert_eq!(outdated[0].id, "lint@m");
    assert_eq!(outdated[0].available_version, "2.1.0");

    assert_eq!(resolution.constraint_overrides.len(), 1);
    assert_eq!(resolution.constraint_overrides[0].winning_source, "default");
}

#[test]
fn test_pipeline_output_serializes_camel_case() {
    let store = profiles(&[("default", &["a@m >= 2"])]);
    let resolution = resolve_profiles(&store, &[] as &[&str], &["a@m >= 1"]);
    let diff = diff_plugins(&resolution.plugins, &[local("a@m", "2.0")], Path::new(PROJECT));

    let overrides = serde_json::to_value(&resolution.constraint_overrides).unwrap();
    assert_eq!(overrides[0]["pluginId"], "a@m");
    assert_eq!(overrides[0]["winningSource"], "default");

    let present = serde_json::to_value(&diff.present).unwrap();
    assert_eq!(present[0]["id"], "a@m");
    assert_eq!(present[0]["projectPath"], PROJECT);
    assert_eq!(present[0]["source"], "default");
    assert_eq!(present[0]["scope"], "local");
}
