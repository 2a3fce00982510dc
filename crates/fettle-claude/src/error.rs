//! Error types for Claude CLI operations

/// Errors that can occur while talking to the `claude` executable
#[derive(Debug, thiserror::Error)]
pub enum ClaudeError {
    /// The executable could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Subprocess exited with non-zero status
    #[error("Command failed (exit code {code}): {stderr}")]
    CommandFailed {
        /// Exit code from the subprocess
        code: i32,
        /// Captured stderr output
        stderr: String,
    },

    /// Output was not the JSON we expected
    #[error("Failed to parse output: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading marketplace files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Claude operations
pub type Result<T> = std::result::Result<T, ClaudeError>;
