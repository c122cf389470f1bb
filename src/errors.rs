/*!
 * Error types for the subshift application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while decoding or shifting subtitle timings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// A timestamp did not match the `HH:MM:SS,mmm` shape
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// The offending text
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// A shift was requested with a zero delta
    #[error("Shift offset must be non-zero")]
    ZeroShift,

    /// A user supplied offset could not be understood
    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    /// A user supplied selection could not be understood
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

impl SubtitleError {
    pub(crate) fn invalid_timestamp(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
