//! Header metadata returned by the reader

use crate::{CodecError, Result, TType};

/// Message kind carried in the message header's top three bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Call = 1,
    Reply = 2,
    Exception = 3,
    Oneway = 4,
}

impl MessageType {
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Self::Call),
            2 => Ok(Self::Reply),
            3 => Ok(Self::Exception),
            4 => Ok(Self::Oneway),
            other => Err(CodecError::protocol(format!(
                "unknown message type: {other}"
            ))),
        }
    }
}

/// Decoded message header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadata {
    pub name: String,
    pub message_type: MessageType,
    pub seq_id: i32,
}

/// Decoded field header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMetadata {
    pub field_id: i16,
    pub ttype: TType,
}

impl FieldMetadata {
    pub(crate) const STOP: Self = Self {
        field_id: 0,
        ttype: TType::Stop,
    };

    /// Whether this header terminates the struct's field list
    pub fn is_stop(&self) -> bool {
        self.ttype == TType::Stop
    }
}

/// Decoded list header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMetadata {
    pub elem_type: TType,
    pub size: usize,
}

/// Decoded set header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMetadata {
    pub elem_type: TType,
    pub size: usize,
}

/// Decoded map header. Key and value types are `Stop` for empty maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapMetadata {
    pub key_type: TType,
    pub value_type: TType,
    pub size: usize,
}
