//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Input could not be decoded as the requested payload
    #[error("Failed to decode {kind} from {}: {message}", path.display())]
    Decode {
        path: PathBuf,
        kind: &'static str,
        message: String,
    },

    /// Some dispatched events were not acknowledged by the collector
    #[error("{failed} of {total} flushes failed; undelivered events remain stored")]
    Undelivered { failed: u64, total: u64 },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn decode(path: impl Into<PathBuf>, kind: &'static str, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            kind,
            message: message.to_string(),
        }
    }
}
