//! CLI error types and exit codes.

use listkit_core::error::ConfigError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - settings, payload mismatch, I/O
    pub const GENERAL_ERROR: i32 = 1;
    /// Usage error - bad arguments or an unparsable script
    pub const USAGE_ERROR: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Settings error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload does not carry the expected prefix
    #[error("Payload does not start with '{expected}'")]
    PrefixMismatch {
        /// Prefix the payload was checked against
        expected: String,
    },

    /// Invalid arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// Unparsable script line
    #[error("Script error on line {line}: {message}")]
    Script {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Failed to render output
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (settings, payload mismatch, output, IO)
    /// - 2: Usage error (arguments, script syntax)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Script { .. } => exit_codes::USAGE_ERROR,
            Self::Config(_) | Self::PrefixMismatch { .. } | Self::Output(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
