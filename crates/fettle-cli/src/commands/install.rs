//! Install command implementation
//!
//! Unlike `status`, any resolution error stops the run before anything is
//! installed. In hook mode stdout is reserved for the agent session: it
//! stays empty unless plugins were installed, and errors go to stderr.

use colored::Colorize;
use fettle_claude::{PluginActions, ensure_marketplaces};
use fettle_core::{PluginInventory, ProfileResolver, diff_plugins};

use super::{CommandOutput, NO_CONFIG};
use crate::context::{AppContext, ConfigState};
use crate::error::Result;
use crate::output;

const HOOK_NOT_CONFIGURED: &str = "\
⚠️ FETTLE NOT CONFIGURED FOR THIS PROJECT ⚠️

IMPORTANT: Before doing anything else, inform the user:
\"I notice fettle (your plugin manager) isn't set up for this project.
Create .claude/fettle.toml to configure plugins, or leave it empty to skip.\"

This message will stop appearing once fettle is configured.";

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    pub dry_run: bool,
    pub hook: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallFailure {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallResult {
    pub installed: Vec<String>,
    pub failed: Vec<InstallFailure>,
    pub already_present: Vec<String>,
}

/// Run the install command
pub fn run_install<B>(ctx: &AppContext, backend: &B, options: InstallOptions) -> Result<CommandOutput>
where
    B: PluginInventory + PluginActions,
{
    let fail = |message: String| {
        if options.hook {
            CommandOutput::failure("").with_diagnostic(output::hook_error(&message))
        } else {
            CommandOutput::failure(message)
        }
    };

    let config = match ctx.load_config() {
        ConfigState::Missing if options.hook => {
            return Ok(CommandOutput::success(HOOK_NOT_CONFIGURED));
        }
        ConfigState::Missing => return Ok(CommandOutput::failure(NO_CONFIG)),
        ConfigState::Invalid(e) => return Ok(fail(format!("Failed to read config: {e}"))),
        ConfigState::Loaded(config) => config,
    };

    let mut out = String::new();

    if !options.hook {
        let global = ctx.global_config();
        if !global.marketplaces.is_empty() {
            let result =
                ensure_marketplaces(&global.marketplaces, &ctx.paths.marketplaces_dir(), backend);
            if !result.added.is_empty() || !result.failed.is_empty() {
                out.push_str(&format!("{}\n", output::header("Marketplaces:")));
                for name in &result.added {
                    out.push_str(&format!("  {} {}\n", output::install(), name));
                }
                for failure in &result.failed {
                    out.push_str(&format!(
                        "  {} {} {}\n",
                        output::missing(),
                        failure.name,
                        format!("- {}", failure.error).dimmed()
                    ));
                }
                out.push('\n');
            }
        }
    }

    let store = ctx.profile_store();
    let resolution = ProfileResolver::new(&store).resolve(&config.profiles, &config.plugins);

    if !resolution.is_ok() {
        let messages = resolution.error_messages();
        if options.hook {
            let listing: Vec<String> = messages.iter().map(|m| format!("  - {m}")).collect();
            let message = format!("Profile errors:\n{}", listing.join("\n"));
            return Ok(fail(message));
        }
        out.push_str(&output::header("Profile errors:").to_string());
        for message in &messages {
            out.push_str(&format!("\n  {} {}", output::missing(), message));
        }
        return Ok(CommandOutput::failure(out));
    }

    let installed = match backend.list() {
        Ok(installed) => installed,
        Err(e) => return Ok(fail(format!("Failed to list installed plugins: {e}"))),
    };
    let diff = diff_plugins(&resolution.plugins, &installed, ctx.root());

    if !options.hook {
        out.push_str(&output::context_line(ctx.root()));
    }

    if options.dry_run {
        if diff.missing.is_empty() {
            out.push_str(&all_present(diff.present.len()));
        } else {
            out.push_str(&output::header("Would install:").to_string());
            for plugin in &diff.missing {
                out.push_str(&format!("\n  {} {}", output::install(), plugin.id));
            }
        }
        return Ok(CommandOutput::success(out));
    }

    let mut result = InstallResult {
        already_present: diff.present.iter().map(|p| p.id().to_string()).collect(),
        ..InstallResult::default()
    };
    let mut diagnostics = Vec::new();

    for plugin in &diff.missing {
        tracing::debug!(plugin = %plugin.id, source = %plugin.source, "Installing plugin");
        match backend.install(&plugin.id) {
            Ok(()) => result.installed.push(plugin.id.clone()),
            Err(e) => {
                let error = e.to_string();
                if options.hook {
                    diagnostics.push(output::hook_error(&format!(
                        "Failed to install {}: {}",
                        plugin.id, error
                    )));
                }
                result.failed.push(InstallFailure {
                    id: plugin.id.clone(),
                    error,
                });
            }
        }
    }

    let exit_code = if result.failed.is_empty() { 0 } else { 1 };

    if options.hook {
        let output = if exit_code == 0 {
            format_install_result_hook(&result)
        } else {
            String::new()
        };
        return Ok(CommandOutput {
            output,
            exit_code,
            diagnostics,
        });
    }

    out.push_str(&format_install_result(&result));
    Ok(CommandOutput {
        output: out,
        exit_code,
        diagnostics,
    })
}

fn all_present(count: usize) -> String {
    format!(
        "{} {}",
        output::present(),
        format!("All {count} plugins present").green()
    )
}

/// Human-readable summary of an install run.
pub fn format_install_result(result: &InstallResult) -> String {
    if result.installed.is_empty() && result.failed.is_empty() {
        return all_present(result.already_present.len());
    }

    let mut lines = Vec::new();

    if !result.installed.is_empty() {
        lines.push(output::header("Installed:").to_string());
        for id in &result.installed {
            lines.push(format!("  {} {}", output::install(), id));
        }
    }

    if !result.failed.is_empty() {
        if !result.installed.is_empty() {
            lines.push(String::new());
        }
        lines.push(output::header("Failed:").to_string());
        for failure in &result.failed {
            lines.push(format!(
                "  {} {} {}",
                output::missing(),
                failure.id,
                format!("- {}", failure.error).dimmed()
            ));
        }
    }

    let mut summary = Vec::new();
    if !result.installed.is_empty() {
        summary.push(
            format!("{} installed", output::plural(result.installed.len(), "plugin"))
                .cyan()
                .to_string(),
        );
    }
    if !result.failed.is_empty() {
        summary.push(format!("{} failed", result.failed.len()).red().to_string());
    }

    lines.push(String::new());
    lines.push(summary.join(", "));
    lines.join("\n")
}

/// Hook-mode summary: empty unless something was installed.
pub fn format_install_result_hook(result: &InstallResult) -> String {
    if result.installed.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "<system-reminder>".to_string(),
        format!(
            "Fettle installed {} for this project:",
            output::plural(result.installed.len(), "plugin")
        ),
    ];
    lines.extend(result.installed.iter().map(|id| format!("  - {id}")));
    lines.extend([
        String::new(),
        "User should restart Claude Code to activate them.".to_string(),
        "User can run `fettle status` to see configured plugins.".to_string(),
        "</system-reminder>".to_string(),
    ]);
    lines.join("\n")
}
