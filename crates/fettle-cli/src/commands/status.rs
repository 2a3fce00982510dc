//! Status command implementation
//!
//! Read-only. Problems found along the way are reported next to the diff
//! instead of stopping it.

use std::path::PathBuf;

use colored::Colorize;
use fettle_claude::PluginActions;
use fettle_core::{
    ConstraintOverride, InstalledPlugin, OutdatedEntry, PluginDiff, PluginInventory,
    PresentPlugin, ProfileResolver, ResolvedPlugin, diff_plugins, find_outdated,
};
use serde::Serialize;

use super::{CommandOutput, NO_CONFIG};
use crate::context::{AppContext, ConfigState};
use crate::error::Result;
use crate::output;

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusOptions {
    pub json: bool,
    pub refresh: bool,
}

/// Everything `status` knows, also its `--json` shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub project_root: PathBuf,
    pub present: Vec<PresentPlugin>,
    pub missing: Vec<ResolvedPlugin>,
    pub extra: Vec<InstalledPlugin>,
    pub outdated: Vec<OutdatedEntry>,
    pub unsatisfied: Vec<PresentPlugin>,
    pub constraint_overrides: Vec<ConstraintOverride>,
    pub errors: Vec<String>,
}

impl StatusReport {
    fn new(
        project_root: PathBuf,
        diff: PluginDiff,
        outdated: Vec<OutdatedEntry>,
        constraint_overrides: Vec<ConstraintOverride>,
        errors: Vec<String>,
    ) -> Self {
        let unsatisfied = diff.unsatisfied().cloned().collect();
        Self {
            project_root,
            present: diff.present,
            missing: diff.missing,
            extra: diff.extra,
            outdated,
            unsatisfied,
            constraint_overrides,
            errors,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.missing.is_empty() && self.errors.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Run the status command
pub fn run_status<B>(ctx: &AppContext, backend: &B, options: StatusOptions) -> Result<CommandOutput>
where
    B: PluginInventory + PluginActions,
{
    let config = match ctx.load_config() {
        ConfigState::Missing => return Ok(CommandOutput::failure(NO_CONFIG)),
        ConfigState::Invalid(e) => {
            return Ok(CommandOutput::failure(format!("Failed to read config: {e}")));
        }
        ConfigState::Loaded(config) => config,
    };

    let mut diagnostics = Vec::new();
    if options.refresh {
        if let Err(e) = backend.refresh_marketplaces() {
            diagnostics.push(format!("Failed to refresh marketplaces: {e}"));
        }
    }

    let store = ctx.profile_store();
    let resolution = ProfileResolver::new(&store).resolve(&config.profiles, &config.plugins);

    let installed = match backend.list() {
        Ok(installed) => installed,
        Err(e) => {
            return Ok(CommandOutput::failure(format!(
                "Failed to list installed plugins: {e}"
            )));
        }
    };

    let available = backend.list_available().unwrap_or_else(|e| {
        diagnostics.push(format!("Could not read marketplaces: {e}"));
        Vec::new()
    });

    let diff = diff_plugins(&resolution.plugins, &installed, ctx.root());
    let outdated = find_outdated(&diff.present, &available);
    let errors = resolution.error_messages();

    let report = StatusReport::new(
        ctx.root().to_path_buf(),
        diff,
        outdated,
        resolution.constraint_overrides,
        errors,
    );

    let output = if options.json {
        serde_json::to_string_pretty(&report)?
    } else {
        format!("{}{}", output::context_line(ctx.root()), format_status(&report))
    };

    Ok(CommandOutput {
        output,
        exit_code: report.exit_code(),
        diagnostics,
    })
}

/// Render the report as the human-readable status listing.
pub fn format_status(report: &StatusReport) -> String {
    let mut lines = Vec::new();

    for plugin in &report.present {
        lines.push(format!(
            "{} {} v{}{} {}",
            output::present(),
            plugin.id(),
            plugin.version(),
            output::constraint_suffix(plugin.constraint.as_deref()),
            output::provenance(&plugin.source),
        ));
    }

    for plugin in &report.missing {
        lines.push(format!(
            "{} {}{} {} {}",
            output::missing(),
            plugin.id,
            output::constraint_suffix(plugin.constraint.as_deref()),
            output::provenance(&plugin.source),
            "missing".red(),
        ));
    }

    for plugin in &report.extra {
        lines.push(format!(
            "{} {} v{} {}",
            output::extra(),
            plugin.id,
            plugin.version,
            "(not in config)".dimmed(),
        ));
    }

    if !report.outdated.is_empty() {
        lines.push(String::new());
        lines.push(output::header("Outdated:").to_string());
        for entry in &report.outdated {
            lines.push(format!(
                "  {} {} v{} → v{}",
                output::outdated(),
                entry.id,
                entry.installed_version,
                entry.available_version
            ));
        }
    }

    if !report.unsatisfied.is_empty() {
        lines.push(String::new());
        lines.push(output::header("Unsatisfied constraints:").to_string());
        for plugin in &report.unsatisfied {
            lines.push(format!(
                "  {} {} v{} is below >= {} {}",
                output::missing(),
                plugin.id(),
                plugin.version(),
                plugin.constraint.as_deref().unwrap_or_default(),
                output::provenance(&plugin.source),
            ));
        }
    }

    if !report.constraint_overrides.is_empty() {
        lines.push(String::new());
        lines.push(output::header("Constraint overrides:").to_string());
        for o in &report.constraint_overrides {
            lines.push(format!(
                "  {} {}: project asks >= {}, {} requires >= {}",
                output::overridden(),
                o.plugin_id,
                o.project_constraint,
                o.winning_source,
                o.winning_constraint
            ));
        }
    }

    if !report.errors.is_empty() {
        lines.push(String::new());
        lines.push(output::header("Profile errors:").to_string());
        for error in &report.errors {
            lines.push(format!("  {} {}", output::missing(), error));
        }
    }

    let summary: Vec<String> = [
        (report.present.len(), "present"),
        (report.missing.len(), "missing"),
        (report.extra.len(), "extra"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{count} {label}"))
    .collect();

    lines.push(String::new());
    if summary.is_empty() {
        lines.push("No plugins configured".to_string());
    } else {
        lines.push(summary.join(", "));
    }

    lines.join("\n")
}
