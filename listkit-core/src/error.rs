//! Error types for listkit
//!
//! The coordinators themselves never fail: bad input degrades to a no-op.
//! Errors only arise from the ambient layers, loading and validating
//! settings here and subscriber setup in [`crate::tracing`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors related to coordinator settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse a settings document
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// A setting holds an unusable value
    #[error("Invalid setting '{field}': {reason}")]
    Validation {
        /// Dotted path of the offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Settings file not found
    #[error("Settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read a settings file
    #[error("Failed to read settings from {}: {source}", path.display())]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write a settings file
    #[error("Failed to write settings: {0}")]
    Write(String),

    /// Failed to serialize settings
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}

impl ConfigError {
    /// Builds a [`ConfigError::Validation`] for `field`.
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for settings operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
