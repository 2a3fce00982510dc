//! Project root discovery

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::project::PROJECT_CONFIG_PATH;

/// The git top-level containing `cwd`, or `cwd` itself outside a repository.
pub fn resolve_project_root(cwd: &Path) -> PathBuf {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(cwd)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if root.is_empty() {
                cwd.to_path_buf()
            } else {
                PathBuf::from(root)
            }
        }
        Ok(output) => {
            tracing::debug!(
                cwd = %cwd.display(),
                code = ?output.status.code(),
                "Not inside a git repository, using working directory"
            );
            cwd.to_path_buf()
        }
        Err(e) => {
            tracing::debug!(error = %e, "git unavailable, using working directory");
            cwd.to_path_buf()
        }
    }
}

/// `<root>/.claude/fettle.toml` when it exists.
pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let path = root.join(PROJECT_CONFIG_PATH);
    path.is_file().then_some(path)
}

/// Where a command runs: the project root and its config file, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl ProjectContext {
    pub fn discover(cwd: &Path) -> Self {
        let root = resolve_project_root(cwd);
        let config_path = find_config_path(&root);
        tracing::debug!(root = %root.display(), config = ?config_path, "Resolved project context");
        Self { root, config_path }
    }
}
