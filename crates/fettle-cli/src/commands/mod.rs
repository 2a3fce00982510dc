//! Command implementations for fettle-cli
//!
//! Each driver returns a [`CommandOutput`] instead of printing, so the same
//! code path serves the binary and the tests.

pub mod completions;
pub mod install;
pub mod marketplace;
pub mod profiles;
pub mod status;
pub mod update;

pub use completions::run_completions;
pub use install::{InstallOptions, run_install};
pub use marketplace::run_marketplace_refresh;
pub use profiles::run_profiles;
pub use status::{StatusOptions, run_status};
pub use update::{UpdateOptions, run_update};

pub(crate) const NO_CONFIG: &str =
    "No fettle.toml found. Create .claude/fettle.toml to declare this project's plugins.";

/// What a command prints and how the process should exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Written to stdout when non-empty
    pub output: String,
    pub exit_code: i32,
    /// Written to stderr line by line
    pub diagnostics: Vec<String>,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit_code: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit_code: 1,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostic(mut self, message: impl Into<String>) -> Self {
        self.diagnostics.push(message.into());
        self
    }

    pub fn emit(&self) {
        if !self.output.is_empty() {
            println!("{}", self.output);
        }
        for line in &self.diagnostics {
            eprintln!("{line}");
        }
    }
}
