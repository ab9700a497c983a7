//! CLI error types with exit code handling
//!
//! Every library error is mapped onto one of these variants so that the
//! process exit code tells scripts what kind of failure happened.

use charmkit_core::{CoreError, SeriesError};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// No usable series for the deployment
    #[error("{message}")]
    #[diagnostic(code(charmkit::cli::series))]
    Series {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Charm structure or content error
    #[error("Charm error: {message}")]
    #[diagnostic(code(charmkit::cli::charm))]
    Charm {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A revision control tool could not be run or exited non-zero
    #[error("{message}")]
    #[diagnostic(code(charmkit::cli::command))]
    Command {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(charmkit::cli::io))]
    Io { message: String },

    /// Invalid combination of arguments
    #[error("{message}")]
    #[diagnostic(code(charmkit::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(charmkit::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Series { .. } => exit_codes::SERIES_ERROR,
            CliError::Charm { .. } => exit_codes::CHARM_ERROR,
            CliError::Command { .. } => exit_codes::COMMAND_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a usage error with help text
    pub fn usage_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an IO error from a message
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<SeriesError> for CliError {
    fn from(err: SeriesError) -> Self {
        let help = match &err {
            SeriesError::Missing => {
                Some("pass --series (or set CHARMKIT_SERIES) to choose one".to_string())
            }
            SeriesError::Unsupported(details) => Some(format!(
                "deploy with one of: {}",
                details.supported_series().join(", ")
            )),
        };
        CliError::Series {
            message: err.to_string(),
            help,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Series(series) => series.into(),
            CoreError::CommandSpawn { ref command, .. } => {
                let program = command.split_whitespace().next().unwrap_or_default();
                CliError::Command {
                    help: Some(format!("is `{program}` installed and on PATH?")),
                    message: err.to_string(),
                }
            }
            CoreError::CommandFailed { ref output, .. } => {
                let output = String::from_utf8_lossy(output).trim().to_string();
                CliError::Command {
                    message: err.to_string(),
                    help: (!output.is_empty()).then_some(output),
                }
            }
            CoreError::Io(io) => CliError::Io {
                message: io.to_string(),
            },
            CoreError::InvalidCharm { .. }
            | CoreError::InvalidRevision { .. }
            | CoreError::YamlParse(_)
            | CoreError::Archive { .. } => CliError::Charm {
                message: err.to_string(),
                help: None,
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
