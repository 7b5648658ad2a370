//! Structural skipping of unrecognized fields
//!
//! Decoders call [`skip`] for any field id they do not know (or whose wire
//! type does not match), which is what lets old readers accept payloads
//! from newer writers.

use crate::transport::InputTransport;
use crate::{CodecError, CompactReader, Result, TType};

/// Deepest container nesting `skip` will descend into
pub const MAX_SKIP_DEPTH: usize = 64;

/// Consume exactly one value of type `ttype`, including nested contents
pub fn skip<T: InputTransport>(reader: &mut CompactReader<T>, ttype: TType) -> Result<()> {
    skip_nested(reader, ttype, MAX_SKIP_DEPTH)
}

fn skip_nested<T: InputTransport>(
    reader: &mut CompactReader<T>,
    ttype: TType,
    depth_left: usize,
) -> Result<()> {
    if depth_left == 0 {
        return Err(CodecError::DepthLimitExceeded {
            limit: MAX_SKIP_DEPTH,
        });
    }

    match ttype {
        TType::Bool => {
            reader.read_bool()?;
        }
        TType::Byte => {
            reader.read_byte()?;
        }
        TType::I16 => {
            reader.read_i16()?;
        }
        TType::I32 => {
            reader.read_i32()?;
        }
        TType::I64 => {
            reader.read_i64()?;
        }
        TType::Double => {
            reader.read_double()?;
        }
        // Binary read: skipped strings need not be valid UTF-8
        TType::String => {
            reader.read_binary()?;
        }
        TType::Struct => {
            reader.read_struct_begin()?;
            loop {
                let field = reader.read_field_begin()?;
                if field.is_stop() {
                    break;
                }
                skip_nested(reader, field.ttype, depth_left - 1)?;
                reader.read_field_end()?;
            }
            reader.read_struct_end()?;
        }
        TType::List => {
            let list = reader.read_list_begin()?;
            for _ in 0..list.size {
                skip_nested(reader, list.elem_type, depth_left - 1)?;
            }
            reader.read_list_end()?;
        }
        TType::Set => {
            let set = reader.read_set_begin()?;
            for _ in 0..set.size {
                skip_nested(reader, set.elem_type, depth_left - 1)?;
            }
            reader.read_set_end()?;
        }
        TType::Map => {
            let map = reader.read_map_begin()?;
            for _ in 0..map.size {
                skip_nested(reader, map.key_type, depth_left - 1)?;
                skip_nested(reader, map.value_type, depth_left - 1)?;
            }
            reader.read_map_end()?;
        }
        TType::Stop => return Err(CodecError::protocol("cannot skip a STOP marker")),
    }

    Ok(())
}
