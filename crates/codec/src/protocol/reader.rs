//! Compact protocol decoder

use bytes::Bytes;

use crate::transport::InputTransport;
use crate::varint::{
    decode_varint, zigzag_decode_32, zigzag_decode_64, MAX_VARINT32_LEN, MAX_VARINT64_LEN,
};
use crate::{compact, CodecError, Result, TType};

use super::{
    FieldMetadata, ListMetadata, MapMetadata, MessageMetadata, MessageType, SetMetadata,
    PROTOCOL_ID, TYPE_BITS, TYPE_SHIFT_AMOUNT, VERSION, VERSION_MASK,
};

/// Boolean value read from a field header, held for the next `read_bool`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoolValue {
    Idle,
    Cached(bool),
}

/// Reads compact protocol bytes from an [`InputTransport`]
///
/// Not thread-safe; one reader serves one decode.
pub struct CompactReader<T> {
    transport: T,
    last_field_id: i16,
    field_stack: Vec<i16>,
    bool_value: BoolValue,
}

impl<T: InputTransport> CompactReader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_field_id: 0,
            field_stack: Vec::new(),
            bool_value: BoolValue::Idle,
        }
    }

    /// Give back the underlying transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.transport.remaining()
    }

    pub fn read_message_begin(&mut self) -> Result<MessageMetadata> {
        let protocol_id = self.read_byte_u8()?;
        if protocol_id != PROTOCOL_ID {
            return Err(CodecError::protocol(format!(
                "expected protocol id {PROTOCOL_ID:#04x} but got {protocol_id:#04x}"
            )));
        }

        let version_and_type = self.read_byte_u8()?;
        let version = version_and_type & VERSION_MASK;
        if version != VERSION {
            return Err(CodecError::protocol(format!(
                "version mismatch; expected version {VERSION} but got {version}"
            )));
        }

        let message_type =
            MessageType::from_id((version_and_type >> TYPE_SHIFT_AMOUNT) & TYPE_BITS)?;
        let seq_id = self.read_varint32()? as i32;
        let name = self.read_string()?;

        Ok(MessageMetadata {
            name,
            message_type,
            seq_id,
        })
    }

    pub fn read_message_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_struct_begin(&mut self) -> Result<()> {
        self.field_stack.push(self.last_field_id);
        self.last_field_id = 0;
        Ok(())
    }

    pub fn read_struct_end(&mut self) -> Result<()> {
        self.last_field_id = self
            .field_stack
            .pop()
            .ok_or_else(|| CodecError::protocol("read_struct_end without matching begin"))?;
        Ok(())
    }

    pub fn read_field_begin(&mut self) -> Result<FieldMetadata> {
        let header = self.read_byte_u8()?;
        let compact_type = header & 0x0F;
        if compact_type == compact::STOP {
            return Ok(FieldMetadata::STOP);
        }
        let ttype = TType::from_compact(compact_type)?;

        let modifier = (header & 0xF0) >> 4;
        let field_id = if modifier == 0 {
            self.read_i16()?
        } else {
            self.last_field_id.wrapping_add(i16::from(modifier))
        };

        if ttype == TType::Bool {
            self.bool_value = BoolValue::Cached(compact_type == compact::BOOLEAN_TRUE);
        }
        self.last_field_id = field_id;

        Ok(FieldMetadata { field_id, ttype })
    }

    pub fn read_field_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_map_begin(&mut self) -> Result<MapMetadata> {
        let size = self.read_size()?;
        if size == 0 {
            return Ok(MapMetadata {
                key_type: TType::Stop,
                value_type: TType::Stop,
                size,
            });
        }

        let types = self.read_byte_u8()?;
        let key_type = TType::from_compact(types >> 4)?;
        let value_type = TType::from_compact(types & 0x0F)?;
        self.check_collection_size(size)?;

        Ok(MapMetadata {
            key_type,
            value_type,
            size,
        })
    }

    pub fn read_map_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_list_begin(&mut self) -> Result<ListMetadata> {
        let (elem_type, size) = self.read_collection_begin()?;
        Ok(ListMetadata { elem_type, size })
    }

    pub fn read_list_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_set_begin(&mut self) -> Result<SetMetadata> {
        let (elem_type, size) = self.read_collection_begin()?;
        Ok(SetMetadata { elem_type, size })
    }

    pub fn read_set_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        if let BoolValue::Cached(value) = self.bool_value {
            self.bool_value = BoolValue::Idle;
            return Ok(value);
        }
        Ok(self.read_byte_u8()? == compact::BOOLEAN_TRUE)
    }

    pub fn read_byte(&mut self) -> Result<i8> {
        Ok(self.read_byte_u8()? as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(zigzag_decode_32(self.read_varint32()?) as i16)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(zigzag_decode_32(self.read_varint32()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(zigzag_decode_64(self.read_varint(MAX_VARINT64_LEN)?))
    }

    pub fn read_double(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.transport.read_exact(&mut buf)?;
        Ok(f64::from_bits(u64::from_le_bytes(buf)))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_binary()?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    pub fn read_binary(&mut self) -> Result<Bytes> {
        let len = self.read_size()?;
        if len == 0 {
            return Ok(Bytes::new());
        }
        self.transport.read_bytes(len)
    }

    fn read_collection_begin(&mut self) -> Result<(TType, usize)> {
        let size_and_type = self.read_byte_u8()?;
        let mut size = usize::from(size_and_type >> 4);
        if size == 0x0F {
            size = self.read_size()?;
        }
        let elem_type = TType::from_compact(size_and_type & 0x0F)?;
        self.check_collection_size(size)?;
        Ok((elem_type, size))
    }

    /// Every element occupies at least one byte, so a declared size larger
    /// than the remaining input is malformed.
    fn check_collection_size(&self, size: usize) -> Result<()> {
        let available = self.transport.remaining();
        if size > available {
            return Err(CodecError::protocol(format!(
                "collection declares {size} elements but only {available} bytes remain"
            )));
        }
        Ok(())
    }

    fn read_size(&mut self) -> Result<usize> {
        let size = self.read_varint32()? as i32;
        usize::try_from(size).map_err(|_| CodecError::protocol(format!("negative size: {size}")))
    }

    fn read_varint32(&mut self) -> Result<u32> {
        Ok(self.read_varint(MAX_VARINT32_LEN)? as u32)
    }

    fn read_varint(&mut self, max_len: usize) -> Result<u64> {
        let mut scratch = [0u8; MAX_VARINT64_LEN];
        for i in 0..max_len {
            let byte = self.read_byte_u8()?;
            scratch[i] = byte;
            if byte & 0x80 == 0 {
                let (value, _) = decode_varint(&scratch[..=i], max_len)?;
                return Ok(value);
            }
        }
        Err(CodecError::protocol(format!(
            "varint longer than {max_len} bytes"
        )))
    }

    fn read_byte_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.transport.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}
