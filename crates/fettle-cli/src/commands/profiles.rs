//! Profiles command implementation

use colored::Colorize;
use fettle_core::DEFAULT_PROFILE;

use super::CommandOutput;
use crate::context::{AppContext, ConfigState};
use crate::error::Result;
use crate::output;

/// List the profiles in the fettle home, marking the ones this project uses.
pub fn run_profiles(ctx: &AppContext) -> Result<CommandOutput> {
    let store = ctx.profile_store();
    let names = store.names()?;

    let referenced = match ctx.load_config() {
        ConfigState::Loaded(config) => config.profiles,
        ConfigState::Missing => Vec::new(),
        ConfigState::Invalid(e) => return Err(e.into()),
    };

    if names.is_empty() && referenced.is_empty() {
        return Ok(CommandOutput::success(format!(
            "No profiles found in {}",
            store.dir().display()
        )));
    }

    let mut lines = vec![format!(
        "{} {}",
        output::header("Profiles"),
        format!("({})", store.dir().display()).dimmed()
    )];

    for name in &names {
        let note = if name == DEFAULT_PROFILE {
            Some("auto-included".blue())
        } else if referenced.contains(name) {
            Some("used by this project".magenta())
        } else {
            None
        };
        match note {
            Some(note) => lines.push(format!("  {name} ({note})")),
            None => lines.push(format!("  {name}")),
        }
    }

    let mut exit_code = 0;
    for name in referenced.iter().filter(|name| !names.contains(name)) {
        exit_code = 1;
        lines.push(format!(
            "  {} {} {}",
            output::missing(),
            name,
            "(referenced, not found)".red()
        ));
    }

    Ok(CommandOutput {
        output: lines.join("\n"),
        exit_code,
        diagnostics: Vec::new(),
    })
}
