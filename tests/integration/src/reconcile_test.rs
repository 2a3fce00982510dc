//! End-to-end reconciliation over on-disk configuration
//!
//! Exercises the full flow: project config and profiles on disk -> resolution
//! -> diff against the inventory -> install -> outdated check.

use fettle_claude::{PluginActions, ensure_marketplaces, list_available_plugins};
use fettle_config::{DirProfileStore, GlobalConfig, ProjectConfig};
use fettle_core::profile::resolve_profiles;
use fettle_core::{PluginInventory, diff_plugins, find_outdated};
use fettle_test_utils::{FakeBackend, TestEnv};
use pretty_assertions::assert_eq;

#[test]
fn test_resolve_install_and_converge() {
    let env = TestEnv::new();
    env.write_profile("default", &["base@reg"]);
    env.write_profile("backend", &["db@reg >= 2.0", "lint@reg"]);
    env.write_config(&["lint@reg >= 1.0", "docs@reg"], &["backend"]);

    let config = ProjectConfig::load(&env.config_path()).unwrap();
    let store = DirProfileStore::new(env.paths().profiles_dir());
    let resolution = resolve_profiles(&store, &config.profiles, &config.plugins);
    assert!(resolution.is_ok(), "{:?}", resolution.errors);

    let ids: Vec<&str> = resolution.plugins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["base@reg", "db@reg", "lint@reg", "docs@reg"]);
    assert_eq!(resolution.get("lint@reg").unwrap().source, "backend");
    assert_eq!(resolution.get("lint@reg").unwrap().constraint.as_deref(), Some("1.0"));

    let project = env.project_root();
    let backend = FakeBackend::new(&project)
        .with_local("base@reg", "1.0.0")
        .with_available("db@reg", "2.1.0")
        .with_available("lint@reg", "1.3.0")
        .with_available("docs@reg", "0.4.0");

    let before = diff_plugins(&resolution.plugins, &backend.list().unwrap(), &project);
    let missing: Vec<&str> = before.missing.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(missing, vec!["db@reg", "lint@reg", "docs@reg"]);

    for plugin in &before.missing {
        backend.install(&plugin.id).unwrap();
    }

    let after = diff_plugins(&resolution.plugins, &backend.list().unwrap(), &project);
    assert!(after.is_satisfied());
    assert!(after.extra.is_empty());
    assert_eq!(after.unsatisfied().count(), 0);
    assert_eq!(backend.installs(), vec!["db@reg", "lint@reg", "docs@reg"]);
}

#[test]
fn test_missing_profile_does_not_block_other_layers() {
    let env = TestEnv::new();
    env.write_profile("default", &["base@reg"]);
    env.write_config(&["a@reg", "b@reg ~1.0"], &["ghost"]);

    let config = ProjectConfig::load(&env.config_path()).unwrap();
    let store = DirProfileStore::new(env.paths().profiles_dir());
    let resolution = resolve_profiles(&store, &config.profiles, &config.plugins);

    let ids: Vec<&str> = resolution.plugins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["base@reg", "a@reg"]);
    assert_eq!(resolution.errors.len(), 2);
    assert_eq!(resolution.errors[0].to_string(), "Profile not found: ghost");
}

#[test]
fn test_outdated_from_marketplace_manifests() {
    let env = TestEnv::new();
    env.write_config(&["lint@reg", "fmt@reg"], &[]);
    env.write_marketplace("reg", &[("lint", "1.4.0"), ("fmt", "0.2.0")]);

    let config = ProjectConfig::load(&env.config_path()).unwrap();
    let store = DirProfileStore::new(env.paths().profiles_dir());
    let resolution = resolve_profiles(&store, &config.profiles, &config.plugins);

    let project = env.project_root();
    let backend = FakeBackend::new(&project)
        .with_local("lint@reg", "1.0.0")
        .with_local("fmt@reg", "0.2.0");
    let diff = diff_plugins(&resolution.plugins, &backend.list().unwrap(), &project);

    let available = list_available_plugins(&env.paths().marketplaces_dir()).unwrap();
    let outdated = find_outdated(&diff.present, &available);

    assert_eq!(outdated.len(), 1);
    assert_eq!(outdated[0].id, "lint@reg");
    assert_eq!(outdated[0].installed_version, "1.0.0");
    assert_eq!(outdated[0].available_version, "1.4.0");
}

#[test]
fn test_configured_marketplaces_are_added_once() {
    let env = TestEnv::new();
    env.write_global_marketplaces(&[
        ("reg", "https://github.com/acme/reg"),
        ("extra", "https://github.com/acme/extra"),
    ]);
    env.write_marketplace("reg", &[("lint", "1.0.0")]);

    let global = GlobalConfig::load(&env.paths().global_config_path());
    let backend = FakeBackend::new(env.project_root());
    let result = ensure_marketplaces(&global.marketplaces, &env.paths().marketplaces_dir(), &backend);

    assert_eq!(result.already_installed, vec!["reg"]);
    assert_eq!(result.added, vec!["extra"]);
    assert!(result.failed.is_empty());
    assert_eq!(backend.marketplace_adds(), vec!["https://github.com/acme/extra"]);
}
