//! Codec error types

use thiserror::Error;

/// Errors raised while encoding or decoding compact protocol bytes
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed wire bytes or an API contract violation
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// Integer on the wire has no matching enum variant
    #[error("unexpected value {value} for enum type {enum_name} in field '{field}'")]
    UnknownEnum {
        enum_name: &'static str,
        field: &'static str,
        value: i32,
    },

    /// Required struct field absent from the decoded field list
    #[error("required field '{field}' is missing from {struct_name}")]
    MissingField {
        struct_name: &'static str,
        field: &'static str,
    },

    /// Fewer bytes available than the read requested
    #[error("unexpected end of stream: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Value does not fit the varint scratch buffer
    #[error("cannot represent {value} as a varint in {max} bytes or less")]
    VarintOverflow { value: u64, max: usize },

    /// String field bytes are not UTF-8
    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Skipping recursed deeper than allowed
    #[error("nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

impl CodecError {
    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Whether the input ended before the value was complete
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

/// Codec result alias
pub type Result<T> = std::result::Result<T, CodecError>;
