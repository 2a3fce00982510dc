//! Error values produced by the engine.
//!
//! None of these abort a resolution pass. They are collected into result
//! structures so a caller can report every problem at once.

use serde::Serialize;

/// A configuration line that could not be parsed into a plugin reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{input}: {message}")]
pub struct ParseFailure {
    /// The raw line as it appeared in the configuration.
    pub input: String,
    /// Human-readable reason for the rejection.
    pub message: String,
}

impl ParseFailure {
    pub fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// A problem found while layering profiles and project plugins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// A profile named explicitly by the project does not exist.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// The profile store failed to read or decode a profile.
    #[error("Failed to load profile \"{name}\": {reason}")]
    ProfileUnreadable { name: String, reason: String },

    /// A plugin line was rejected by the constraint parser.
    #[error(transparent)]
    InvalidReference(#[from] ParseFailure),
}
