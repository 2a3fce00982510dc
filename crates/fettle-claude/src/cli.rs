//! Subprocess wrapper for the `claude plugin` command family
//!
//! Every call captures stdout and stderr. A non-zero exit becomes
//! [`ClaudeError::CommandFailed`] carrying the trimmed stderr.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use fettle_core::{InstalledPlugin, Scope};

use crate::error::{ClaudeError, Result};
use crate::marketplace::InstalledMarketplace;

/// Default executable name, looked up on `PATH`.
pub const DEFAULT_CLAUDE_BIN: &str = "claude";

#[derive(Debug, Clone)]
pub struct ClaudeCli {
    program: OsString,
    config_dir: Option<PathBuf>,
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self::new(DEFAULT_CLAUDE_BIN)
    }
}

impl ClaudeCli {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            config_dir: None,
        }
    }

    /// Pass a custom Claude home to the child as `CLAUDE_CONFIG_DIR`.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    /// `claude plugin list --json`
    pub fn list_plugins(&self) -> Result<Vec<InstalledPlugin>> {
        let stdout = self.run(&["plugin", "list", "--json"])?;
        parse_plugin_list(&stdout)
    }

    /// `claude plugin install <id> --scope local`
    pub fn install_plugin(&self, id: &str) -> Result<()> {
        self.run(&["plugin", "install", id, "--scope", "local"])
            .map(drop)
    }

    /// `claude plugin update <id> --scope <scope>`
    pub fn update_plugin(&self, id: &str, scope: Scope) -> Result<()> {
        self.run(&["plugin", "update", id, "--scope", scope.as_str()])
            .map(drop)
    }

    /// `claude plugin marketplace update`
    pub fn refresh_marketplaces(&self) -> Result<()> {
        self.run(&["plugin", "marketplace", "update"]).map(drop)
    }

    /// `claude plugin marketplace add <source>`
    pub fn add_marketplace(&self, source: &str) -> Result<()> {
        self.run(&["plugin", "marketplace", "add", source]).map(drop)
    }

    /// `claude plugin marketplace list --json`, empty on any failure.
    pub fn list_marketplaces(&self) -> Vec<InstalledMarketplace> {
        match self
            .run(&["plugin", "marketplace", "list", "--json"])
            .and_then(|out| Ok(serde_json::from_str(&out)?))
        {
            Ok(marketplaces) => marketplaces,
            Err(e) => {
                tracing::debug!(error = %e, "Could not list marketplaces");
                Vec::new()
            }
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.config_dir {
            cmd.env("CLAUDE_CONFIG_DIR", dir);
        }
        cmd
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(program = ?self.program, ?args, "Running claude");

        let output = self
            .command(args)
            .output()
            .map_err(|source| ClaudeError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            Err(ClaudeError::CommandFailed { code, stderr })
        }
    }
}

/// Parse `claude plugin list --json` output.
///
/// A JSON document that is not an array yields no plugins.
pub fn parse_plugin_list(json: &str) -> Result<Vec<InstalledPlugin>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        tracing::debug!("Plugin list output is not an array, treating as empty");
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}
