//! Terminal styling shared by the commands

use colored::{ColoredString, Colorize};

use fettle_core::PROJECT_SOURCE;
use fettle_core::DEFAULT_PROFILE;

pub fn present() -> ColoredString {
    "✓".green()
}

pub fn missing() -> ColoredString {
    "✗".red()
}

pub fn extra() -> ColoredString {
    "?".yellow()
}

pub fn install() -> ColoredString {
    "+".cyan()
}

pub fn outdated() -> ColoredString {
    "↑".yellow()
}

pub fn overridden() -> ColoredString {
    "!".yellow()
}

pub fn header(text: &str) -> ColoredString {
    text.bold()
}

/// Dimmed `(source)` tag, tinted by where the plugin came from.
pub fn provenance(source: &str) -> ColoredString {
    let tag = format!("({source})");
    match source {
        DEFAULT_PROFILE => tag.dimmed().blue(),
        PROJECT_SOURCE => tag.dimmed().magenta(),
        _ => tag.dimmed().cyan(),
    }
}

/// ` >= 1.2.0` for a constrained plugin, empty otherwise.
pub fn constraint_suffix(constraint: Option<&str>) -> String {
    constraint
        .map(|c| format!(" {}", format!(">= {c}").dimmed()))
        .unwrap_or_default()
}

/// `plugin` or `plugins`.
pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// `Context: <root>` followed by a blank line.
pub fn context_line(root: &std::path::Path) -> String {
    format!("{} {}\n\n", "Context:".dimmed(), root.display())
}

/// Prefix for messages written to stderr in hook mode.
pub fn hook_error(message: &str) -> String {
    format!("[fettle] {message}")
}
