//! Compact protocol encoder

use crate::transport::OutputTransport;
use crate::varint::{encode_varint, zigzag_encode_32, zigzag_encode_64, MAX_VARINT_BYTES};
use crate::{compact, CodecError, Result, TType};

use super::{
    MessageType, MAX_FIELD_DELTA, MAX_SHORT_COLLECTION, PROTOCOL_ID, TYPE_MASK,
    TYPE_SHIFT_AMOUNT, VERSION, VERSION_MASK,
};

/// Deferred boolean field header
///
/// A boolean field's value lives in its header's type nibble, so the header
/// is held back until `write_bool` supplies the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoolField {
    Idle,
    Pending { field_id: i16 },
}

/// Writes compact protocol bytes into an [`OutputTransport`]
///
/// Not thread-safe; one writer serves one encode.
pub struct CompactWriter<T> {
    transport: T,
    last_field_id: i16,
    field_stack: Vec<i16>,
    bool_field: BoolField,
    scratch: [u8; MAX_VARINT_BYTES],
}

impl<T: OutputTransport> CompactWriter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_field_id: 0,
            field_stack: Vec::new(),
            bool_field: BoolField::Idle,
            scratch: [0; MAX_VARINT_BYTES],
        }
    }

    /// Give back the underlying transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn write_message_begin(
        &mut self,
        name: &str,
        message_type: MessageType,
        seq_id: i32,
    ) -> Result<()> {
        self.write_byte_u8(PROTOCOL_ID)?;
        self.write_byte_u8(
            (VERSION & VERSION_MASK) | (((message_type as u8) << TYPE_SHIFT_AMOUNT) & TYPE_MASK),
        )?;
        self.write_varint(u64::from(seq_id as u32))?;
        self.write_string(name)
    }

    pub fn write_message_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn write_struct_begin(&mut self, _name: &str) -> Result<()> {
        self.field_stack.push(self.last_field_id);
        self.last_field_id = 0;
        Ok(())
    }

    pub fn write_struct_end(&mut self) -> Result<()> {
        self.ensure_no_pending_bool("write_struct_end")?;
        self.last_field_id = self
            .field_stack
            .pop()
            .ok_or_else(|| CodecError::protocol("write_struct_end without matching begin"))?;
        Ok(())
    }

    /// Begin a field. The name is advisory and never reaches the wire.
    pub fn write_field_begin(&mut self, _name: &str, field_id: i16, ttype: TType) -> Result<()> {
        self.ensure_no_pending_bool("write_field_begin")?;

        if ttype == TType::Bool {
            self.bool_field = BoolField::Pending { field_id };
            Ok(())
        } else {
            self.write_field_header(field_id, ttype.to_compact())
        }
    }

    fn write_field_header(&mut self, field_id: i16, compact_type: u8) -> Result<()> {
        let delta = i32::from(field_id) - i32::from(self.last_field_id);
        if delta > 0 && delta <= MAX_FIELD_DELTA {
            self.write_byte_u8(((delta as u8) << 4) | compact_type)?;
        } else {
            self.write_byte_u8(compact_type)?;
            self.write_i16(field_id)?;
        }
        self.last_field_id = field_id;
        Ok(())
    }

    pub fn write_field_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn write_field_stop(&mut self) -> Result<()> {
        self.ensure_no_pending_bool("write_field_stop")?;
        self.write_byte_u8(compact::STOP)
    }

    /// A started boolean field must get its value before anything else
    fn ensure_no_pending_bool(&self, action: &str) -> Result<()> {
        match self.bool_field {
            BoolField::Pending { field_id } => Err(CodecError::protocol(format!(
                "{action} called while boolean field {field_id} awaits write_bool"
            ))),
            BoolField::Idle => Ok(()),
        }
    }

    pub fn write_map_begin(&mut self, key_type: TType, value_type: TType, size: usize) -> Result<()> {
        if size == 0 {
            return self.write_byte_u8(0);
        }
        self.write_size(size)?;
        self.write_byte_u8((key_type.to_compact() << 4) | value_type.to_compact())
    }

    pub fn write_map_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn write_list_begin(&mut self, elem_type: TType, size: usize) -> Result<()> {
        self.write_collection_begin(elem_type, size)
    }

    pub fn write_list_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn write_set_begin(&mut self, elem_type: TType, size: usize) -> Result<()> {
        self.write_collection_begin(elem_type, size)
    }

    pub fn write_set_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        let compact_value = if value {
            compact::BOOLEAN_TRUE
        } else {
            compact::BOOLEAN_FALSE
        };

        match self.bool_field {
            BoolField::Pending { field_id } => {
                self.bool_field = BoolField::Idle;
                self.write_field_header(field_id, compact_value)
            }
            BoolField::Idle => self.write_byte_u8(compact_value),
        }
    }

    pub fn write_byte(&mut self, value: i8) -> Result<()> {
        self.write_byte_u8(value as u8)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_varint(u64::from(zigzag_encode_32(i32::from(value))))
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_varint(u64::from(zigzag_encode_32(value)))
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_varint(zigzag_encode_64(value))
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.transport.write_all(&value.to_bits().to_le_bytes())
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_binary(value.as_bytes())
    }

    pub fn write_binary(&mut self, value: &[u8]) -> Result<()> {
        self.write_size(value.len())?;
        self.transport.write_all(value)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.transport.flush()
    }

    fn write_collection_begin(&mut self, elem_type: TType, size: usize) -> Result<()> {
        let compact_type = elem_type.to_compact();
        if size <= MAX_SHORT_COLLECTION {
            self.write_byte_u8(((size as u8) << 4) | compact_type)
        } else {
            self.write_byte_u8(0xF0 | compact_type)?;
            self.write_size(size)
        }
    }

    fn write_size(&mut self, size: usize) -> Result<()> {
        let size = i32::try_from(size)
            .map_err(|_| CodecError::protocol(format!("size {size} exceeds i32::MAX")))?;
        self.write_varint(u64::from(size as u32))
    }

    fn write_varint(&mut self, value: u64) -> Result<()> {
        let len = encode_varint(value, &mut self.scratch)?;
        self.transport.write_all(&self.scratch[..len])
    }

    fn write_byte_u8(&mut self, byte: u8) -> Result<()> {
        self.transport.write_all(&[byte])
    }
}
