//! Layered error definitions
//!
//! Categorized by source: codec / store / transport / config

use codec::CodecError;
use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Codec Errors =====
    /// Encoding or decoding failed
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    // ===== Store Errors =====
    /// Record store operation failed
    #[error("store '{store}' error: {message}")]
    Store { store: String, message: String },

    // ===== Transport Errors =====
    /// Submission could not be delivered
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Collector answered with a non-success status
    #[error("collector at '{url}' returned status {status}")]
    HttpStatus { url: String, status: u16 },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create store error
    pub fn store(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            store: store.into(),
            message: message.into(),
        }
    }

    /// Create transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from delivering a submission
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }
}
