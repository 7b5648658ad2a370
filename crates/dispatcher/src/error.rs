//! Dispatcher error types

use codec::CodecError;
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Stored blob is shorter than its timestamp prefix
    #[error("record too short: {len} bytes, need at least {min}")]
    RecordTooShort { len: usize, min: usize },

    /// Stored timestamp is so far off that the event age overflows
    #[error("stored timestamp {stored_at_ms} is out of range")]
    TimestampOutOfRange { stored_at_ms: i64 },

    /// Store or transport could not be built from configuration
    #[error("failed to create {component}: {message}")]
    Setup { component: String, message: String },

    /// Encoding or decoding failed
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Store or transport error (from contract)
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a setup error
    pub fn setup(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Setup {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Short label for the metrics facade
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecordTooShort { .. } => "too_short",
            Self::TimestampOutOfRange { .. } => "timestamp",
            Self::Setup { .. } => "setup",
            Self::Codec(e) if e.is_truncation() => "truncated",
            Self::Codec(CodecError::UnknownEnum { .. }) => "unknown_enum",
            Self::Codec(_) => "protocol",
            Self::Contract(_) => "contract",
        }
    }
}
