//! Plugin reference parsing.
//!
//! A plugin reference is a single configuration line naming a plugin and,
//! optionally, the minimum version it must be installed at:
//!
//! ```text
//! git@my-marketplace
//! git@my-marketplace >= 1.2.0
//! ```
//!
//! Only `>=` is accepted. Other comparison operators are recognised so they
//! can be rejected with a clear message instead of becoming part of the id.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseFailure;
use crate::version::is_valid_version;

/// Operators that are recognised and rejected, checked in this order.
const UNSUPPORTED_OPERATORS: [&str; 6] = ["<", "<=", ">", "=", "^", "~"];

static MIN_VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*>=\s*(.*)$").unwrap());

/// For each unsupported operator: one pattern with the operator attached to
/// the version (`^1.0.0`) and one with it standing alone (`< 1.0.0`).
static UNSUPPORTED_PATTERNS: LazyLock<Vec<(&'static str, Regex, Regex)>> = LazyLock::new(|| {
    UNSUPPORTED_OPERATORS
        .iter()
        .map(|&op| {
            let escaped = regex::escape(op);
            let attached = Regex::new(&format!(r"^(.+?)\s*{escaped}(\S+)$")).unwrap();
            let spaced = Regex::new(&format!(r"^(.+?)\s+{escaped}\s+(.*)$")).unwrap();
            (op, attached, spaced)
        })
        .collect()
});

/// A parsed plugin reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginReference {
    /// Opaque `name@marketplace` identifier.
    pub id: String,
    /// Minimum acceptable version, if any.
    pub constraint: Option<String>,
}

impl PluginReference {
    /// A reference with no version constraint.
    pub fn unconstrained(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            constraint: None,
        }
    }
}

impl FromStr for PluginReference {
    type Err = ParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_plugin_ref(s)
    }
}

/// Parse one configuration line into a [`PluginReference`].
///
/// # Errors
///
/// Returns a [`ParseFailure`] carrying the original input when the version
/// after `>=` is missing or malformed, or when an unsupported operator is
/// used.
pub fn parse_plugin_ref(input: &str) -> Result<PluginReference, ParseFailure> {
    let trimmed = input.trim();

    if let Some(caps) = MIN_VERSION_PATTERN.captures(trimmed) {
        let id = caps[1].trim();
        let version = caps[2].trim();

        if version.is_empty() {
            return Err(ParseFailure::new(input, "Missing version after \">=\""));
        }

        if !is_valid_version(version) {
            return Err(ParseFailure::new(
                input,
                format!("Invalid version \"{version}\" - expected number segments (e.g., 1.0.0)"),
            ));
        }

        return Ok(PluginReference {
            id: id.to_string(),
            constraint: Some(version.to_string()),
        });
    }

    for (op, attached, spaced) in UNSUPPORTED_PATTERNS.iter() {
        if attached.is_match(trimmed) || spaced.is_match(trimmed) {
            return Err(ParseFailure::new(
                input,
                format!("Unsupported operator \"{op}\". Only \">=\" is supported."),
            ));
        }
    }

    Ok(PluginReference::unconstrained(trimmed))
}

/// The outcome of parsing a whole list of configuration lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPluginList {
    pub plugins: Vec<PluginReference>,
    pub errors: Vec<ParseFailure>,
}

/// Parse every line independently, partitioning successes and failures.
///
/// A bad line never prevents the remaining lines from being parsed.
pub fn parse_plugin_list<S: AsRef<str>>(lines: &[S]) -> ParsedPluginList {
    let mut parsed = ParsedPluginList::default();

    for line in lines {
        match parse_plugin_ref(line.as_ref()) {
            Ok(reference) => parsed.plugins.push(reference),
            Err(failure) => parsed.errors.push(failure),
        }
    }

    parsed
}
