//! [`TestEnv`] builder for fettle test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use fettle_config::FettlePaths;
use tempfile::TempDir;

/// A temporary layout with a project directory, a fettle home and a Claude
/// home, all under one [`TempDir`].
///
/// # Example
///
/// ```rust,no_run
/// use fettle_test_utils::TestEnv;
///
/// let env = TestEnv::new();
/// env.write_profile("default", &["git@reg"]);
/// env.write_config(&["lint@reg >= 1.0"], &[]);
/// env.write_marketplace("reg", &[("lint", "1.2.0")]);
/// ```
pub struct TestEnv {
    temp_dir: TempDir,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let env = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(env.project_root()).unwrap();
        env
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn project_root(&self) -> PathBuf {
        self.root().join("project")
    }

    pub fn fettle_home(&self) -> PathBuf {
        self.root().join("fettle-home")
    }

    pub fn claude_home(&self) -> PathBuf {
        self.root().join("claude-home")
    }

    pub fn paths(&self) -> FettlePaths {
        FettlePaths::new(self.claude_home(), self.fettle_home())
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_root().join(".claude").join("fettle.toml")
    }

    /// Write `.claude/fettle.toml` with the given plugin lines and profiles.
    pub fn write_config(&self, plugins: &[&str], profiles: &[&str]) {
        let content = format!(
            "profiles = {}\nplugins = {}\n",
            toml_array(profiles),
            toml_array(plugins)
        );
        self.write_config_raw(&content);
    }

    pub fn write_config_raw(&self, content: &str) {
        write(&self.config_path(), content);
    }

    pub fn write_profile(&self, name: &str, plugins: &[&str]) {
        let path = self.paths().profiles_dir().join(format!("{name}.toml"));
        write(&path, &format!("plugins = {}\n", toml_array(plugins)));
    }

    pub fn write_profile_raw(&self, name: &str, content: &str) {
        let path = self.paths().profiles_dir().join(format!("{name}.toml"));
        write(&path, content);
    }

    /// Write `config.toml` with a `[marketplaces]` table.
    pub fn write_global_marketplaces(&self, marketplaces: &[(&str, &str)]) {
        let mut content = String::from("[marketplaces]\n");
        for (name, source) in marketplaces {
            content.push_str(&format!("{name} = \"{source}\"\n"));
        }
        write(&self.paths().global_config_path(), &content);
    }

    /// Write a marketplace manifest offering `(plugin, version)` pairs.
    pub fn write_marketplace(&self, name: &str, plugins: &[(&str, &str)]) {
        let plugins: Vec<serde_json::Value> = plugins
            .iter()
            .map(|(plugin, version)| {
                serde_json::json!({
                    "name": plugin,
                    "version": version,
                    "source": format!("./plugins/{plugin}"),
                })
            })
            .collect();
        let manifest = serde_json::json!({ "name": name, "plugins": plugins });

        let path = self
            .paths()
            .marketplaces_dir()
            .join(name)
            .join(".claude-plugin")
            .join("marketplace.json");
        write(&path, &serde_json::to_string_pretty(&manifest).unwrap());
    }
}

fn toml_array(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("{item:?}")).collect();
    format!("[{}]", quoted.join(", "))
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
