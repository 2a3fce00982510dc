//! Update command implementation
//!
//! Works over every plugin installed locally for the project, whether or
//! not the config mentions it, so no `fettle.toml` is required.

use std::path::Path;

use colored::Colorize;
use fettle_claude::PluginActions;
use fettle_core::{
    AvailablePlugin, InstalledPlugin, OutdatedEntry, PluginInventory, find_outdated_installed,
};

use super::CommandOutput;
use crate::context::AppContext;
use crate::error::Result;
use crate::output;

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    pub dry_run: bool,
    pub refresh: bool,
}

/// What an update run would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    /// A requested id is not installed for this project.
    NotInstalled(String),
    /// A requested id is installed and current.
    AlreadyCurrent { id: String, version: String },
    NothingToDo,
    Updates(Vec<OutdatedEntry>),
}

/// Decide which plugins to update.
///
/// With explicit `ids`, the first id that is missing or already current
/// decides the outcome.
pub fn plan_update(
    installed: &[InstalledPlugin],
    available: &[AvailablePlugin],
    project_path: &Path,
    ids: &[String],
) -> UpdatePlan {
    let outdated = find_outdated_installed(installed, available, project_path);

    for id in ids {
        let local = installed
            .iter()
            .find(|p| &p.id == id && p.is_local_to(project_path));

        let Some(local) = local else {
            return UpdatePlan::NotInstalled(id.clone());
        };
        if !outdated.iter().any(|entry| &entry.id == id) {
            return UpdatePlan::AlreadyCurrent {
                id: id.clone(),
                version: local.version.clone(),
            };
        }
    }

    let selected: Vec<OutdatedEntry> = if ids.is_empty() {
        outdated
    } else {
        outdated.into_iter().filter(|entry| ids.contains(&entry.id)).collect()
    };

    if selected.is_empty() {
        UpdatePlan::NothingToDo
    } else {
        UpdatePlan::Updates(selected)
    }
}

/// Run the update command
pub fn run_update<B>(
    ctx: &AppContext,
    backend: &B,
    ids: &[String],
    options: UpdateOptions,
) -> Result<CommandOutput>
where
    B: PluginInventory + PluginActions,
{
    let mut diagnostics = Vec::new();
    if options.refresh {
        if let Err(e) = backend.refresh_marketplaces() {
            diagnostics.push(format!("Failed to refresh marketplaces: {e}"));
        }
    }

    let installed = match backend.list() {
        Ok(installed) => installed,
        Err(e) => {
            return Ok(CommandOutput::failure(format!(
                "Failed to list installed plugins: {e}"
            )));
        }
    };
    let available = match backend.list_available() {
        Ok(available) => available,
        Err(e) => {
            return Ok(CommandOutput::failure(format!("Failed to read marketplaces: {e}")));
        }
    };

    let plan = plan_update(&installed, &available, ctx.root(), ids);
    tracing::debug!(?plan, "Planned update");

    let entries = match plan {
        UpdatePlan::NotInstalled(id) => {
            return Ok(CommandOutput::failure(format!("Error: Plugin \"{id}\" not installed")));
        }
        UpdatePlan::AlreadyCurrent { id, version } => {
            return Ok(CommandOutput::success(format!(
                "{} {id} is already up-to-date (v{version})",
                output::present()
            )));
        }
        UpdatePlan::NothingToDo => {
            return Ok(CommandOutput::success("All plugins are up-to-date."));
        }
        UpdatePlan::Updates(entries) => entries,
    };

    let count = output::plural(entries.len(), "plugin");

    if options.dry_run {
        let mut lines = vec![format!("Would update {count}:")];
        lines.extend(entries.iter().map(|entry| format!("  {}", arrow(entry))));
        return Ok(CommandOutput {
            output: lines.join("\n"),
            exit_code: 0,
            diagnostics,
        });
    }

    let mut lines = vec![format!("Updating {count}...")];
    let mut failed = 0;

    for entry in &entries {
        match backend.update(&entry.id, entry.scope) {
            Ok(()) => lines.push(format!("  {} {}", output::present(), arrow(entry))),
            Err(e) => {
                failed += 1;
                lines.push(format!(
                    "  {} {} {}",
                    output::missing(),
                    entry.id,
                    format!("- {e}").dimmed()
                ));
            }
        }
    }

    let updated = entries.len() - failed;
    lines.push(String::new());
    if failed == 0 {
        lines.push(format!("{} updated", output::plural(updated, "plugin")).cyan().to_string());
    } else {
        lines.push(format!(
            "{}, {}",
            format!("{} updated", output::plural(updated, "plugin")).cyan(),
            format!("{failed} failed").red()
        ));
    }

    Ok(CommandOutput {
        output: lines.join("\n"),
        exit_code: if failed == 0 { 0 } else { 1 },
        diagnostics,
    })
}

fn arrow(entry: &OutdatedEntry) -> String {
    format!(
        "{} {} v{} → v{}",
        output::outdated(),
        entry.id,
        entry.installed_version,
        entry.available_version
    )
}
