//! Shell completion generation

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use super::CommandOutput;
use crate::cli::Cli;

/// Render the completion script for `shell`.
pub fn run_completions(shell: Shell) -> CommandOutput {
    let mut command = Cli::command();
    let mut buffer = Vec::new();
    generate(shell, &mut command, "fettle", &mut buffer);
    CommandOutput::success(String::from_utf8_lossy(&buffer).trim_end().to_string())
}
