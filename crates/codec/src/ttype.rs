//! Logical wire types and their compact 4-bit codes

use crate::{CodecError, Result};

/// Logical field type (Thrift `TType` ids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TType {
    Stop = 0,
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    /// Strings and binary share one wire type
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl TType {
    /// Numeric type id
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up a type by its numeric id
    pub fn from_id(id: u8) -> Result<Self> {
        let ttype = match id {
            0 => Self::Stop,
            2 => Self::Bool,
            3 => Self::Byte,
            4 => Self::Double,
            6 => Self::I16,
            8 => Self::I32,
            10 => Self::I64,
            11 => Self::String,
            12 => Self::Struct,
            13 => Self::Map,
            14 => Self::Set,
            15 => Self::List,
            other => return Err(CodecError::protocol(format!("unknown TType id: {other}"))),
        };
        Ok(ttype)
    }

    /// Compact code for this type. Booleans map to the `true` code.
    pub fn to_compact(self) -> u8 {
        match self {
            Self::Stop => compact::STOP,
            Self::Bool => compact::BOOLEAN_TRUE,
            Self::Byte => compact::BYTE,
            Self::Double => compact::DOUBLE,
            Self::I16 => compact::I16,
            Self::I32 => compact::I32,
            Self::I64 => compact::I64,
            Self::String => compact::BINARY,
            Self::Struct => compact::STRUCT,
            Self::Map => compact::MAP,
            Self::Set => compact::SET,
            Self::List => compact::LIST,
        }
    }

    /// Logical type for a compact code
    pub fn from_compact(code: u8) -> Result<Self> {
        let ttype = match code {
            compact::STOP => Self::Stop,
            compact::BOOLEAN_TRUE | compact::BOOLEAN_FALSE => Self::Bool,
            compact::BYTE => Self::Byte,
            compact::I16 => Self::I16,
            compact::I32 => Self::I32,
            compact::I64 => Self::I64,
            compact::DOUBLE => Self::Double,
            compact::BINARY => Self::String,
            compact::LIST => Self::List,
            compact::SET => Self::Set,
            compact::MAP => Self::Map,
            compact::STRUCT => Self::Struct,
            other => {
                return Err(CodecError::protocol(format!(
                    "unknown compact type id: {other:#04x}"
                )))
            }
        };
        Ok(ttype)
    }
}

/// Compact protocol type codes
pub mod compact {
    pub const STOP: u8 = 0x00;
    pub const BOOLEAN_TRUE: u8 = 0x01;
    pub const BOOLEAN_FALSE: u8 = 0x02;
    pub const BYTE: u8 = 0x03;
    pub const I16: u8 = 0x04;
    pub const I32: u8 = 0x05;
    pub const I64: u8 = 0x06;
    pub const DOUBLE: u8 = 0x07;
    pub const BINARY: u8 = 0x08;
    pub const LIST: u8 = 0x09;
    pub const SET: u8 = 0x0A;
    pub const MAP: u8 = 0x0B;
    pub const STRUCT: u8 = 0x0C;
}
