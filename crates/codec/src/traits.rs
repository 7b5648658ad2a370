use bytes::Bytes;

use crate::transport::{BufferTransport, InputTransport, OutputTransport, SliceTransport};
use crate::{CodecError, CompactReader, CompactWriter, Result};

/// A struct that knows its own compact-protocol field layout
///
/// `write` emits the struct including its begin/stop/end markers; `read`
/// consumes the same and skips fields it does not recognize.
pub trait ThriftStruct: Sized {
    const NAME: &'static str;

    fn write<T: OutputTransport>(&self, writer: &mut CompactWriter<T>) -> Result<()>;

    fn read<T: InputTransport>(reader: &mut CompactReader<T>) -> Result<Self>;
}

/// A closed set of named i32 values
pub trait ThriftEnum: Sized + Copy {
    const NAME: &'static str;

    fn value(self) -> i32;

    fn from_value(value: i32) -> Option<Self>;
}

/// Read an i32 and map it onto `E`, failing on values outside the enum
pub fn read_enum<E: ThriftEnum, T: InputTransport>(
    reader: &mut CompactReader<T>,
    field: &'static str,
) -> Result<E> {
    let value = reader.read_i32()?;
    E::from_value(value).ok_or(CodecError::UnknownEnum {
        enum_name: E::NAME,
        field,
        value,
    })
}

/// Unwrap a decoded field that the schema marks required
pub fn required<V>(value: Option<V>, struct_name: &'static str, field: &'static str) -> Result<V> {
    value.ok_or(CodecError::MissingField { struct_name, field })
}

/// Encode a struct into a standalone buffer
pub fn encode_struct<S: ThriftStruct>(value: &S) -> Result<Bytes> {
    let mut writer = CompactWriter::new(BufferTransport::new());
    value.write(&mut writer)?;
    writer.flush()?;
    Ok(writer.into_transport().into_bytes())
}

/// Decode a struct from a standalone buffer
///
/// Trailing bytes after the struct's stop marker are ignored.
pub fn decode_struct<S: ThriftStruct>(bytes: impl Into<Bytes>) -> Result<S> {
    let mut reader = CompactReader::new(SliceTransport::new(bytes));
    S::read(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{skip, TType};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Blue,
    }

    impl ThriftEnum for Color {
        const NAME: &'static str = "Color";

        fn value(self) -> i32 {
            match self {
                Color::Red => 0,
                Color::Blue => 5,
            }
        }

        fn from_value(value: i32) -> Option<Self> {
            match value {
                0 => Some(Color::Red),
                5 => Some(Color::Blue),
                _ => None,
            }
        }
    }

    #[derive(Debug, PartialEq)]
    struct Pixel {
        id: String,
        color: Option<Color>,
    }

    impl ThriftStruct for Pixel {
        const NAME: &'static str = "Pixel";

        fn write<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
            w.write_struct_begin(Self::NAME)?;
            w.write_field_begin("id", 1, TType::String)?;
            w.write_string(&self.id)?;
            w.write_field_end()?;
            if let Some(color) = self.color {
                w.write_field_begin("color", 2, TType::I32)?;
                w.write_i32(color.value())?;
                w.write_field_end()?;
            }
            w.write_field_stop()?;
            w.write_struct_end()
        }

        fn read<T: InputTransport>(r: &mut CompactReader<T>) -> Result<Self> {
            let mut id = None;
            let mut color = None;
            r.read_struct_begin()?;
            loop {
                let field = r.read_field_begin()?;
                if field.is_stop() {
                    break;
                }
                match (field.field_id, field.ttype) {
                    (1, TType::String) => id = Some(r.read_string()?),
                    (2, TType::I32) => color = Some(read_enum(r, "color")?),
                    (_, ttype) => skip(r, ttype)?,
                }
                r.read_field_end()?;
            }
            r.read_struct_end()?;
            Ok(Pixel {
                id: required(id, Self::NAME, "id")?,
                color,
            })
        }
    }

    #[test]
    fn test_struct_roundtrip() {
        let pixel = Pixel {
            id: "p".into(),
            color: Some(Color::Blue),
        };
        let bytes = encode_struct(&pixel).unwrap();
        assert_eq!(&bytes[..], &[0x18, 1, b'p', 0x15, 10, 0x00]);
        assert_eq!(decode_struct::<Pixel>(bytes).unwrap(), pixel);
    }

    #[test]
    fn test_unknown_enum_value() {
        let bytes = Bytes::from_static(&[0x18, 1, b'p', 0x15, 4, 0x00]);
        let err = decode_struct::<Pixel>(bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownEnum {
                enum_name: "Color",
                field: "color",
                value: 2
            }
        ));
    }

    #[test]
    fn test_missing_required_field() {
        let err = decode_struct::<Pixel>(Bytes::from_static(&[0x15, 0, 0x00])).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MissingField {
                struct_name: "Pixel",
                field: "id"
            }
        ));
    }
}
