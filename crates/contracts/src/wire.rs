//! Field-level encoding shared by the schema types

use codec::{
    read_enum, skip, CodecError, CompactReader, CompactWriter, FieldMetadata, InputTransport,
    OutputTransport, Result, TType, ThriftEnum, ThriftStruct,
};

/// A value that can sit in a struct field or collection slot
pub(crate) trait WireValue: Sized {
    const TTYPE: TType;

    fn write_value<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()>;

    fn read_value<T: InputTransport>(r: &mut CompactReader<T>, field: &'static str)
        -> Result<Self>;
}

impl WireValue for String {
    const TTYPE: TType = TType::String;

    fn write_value<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        w.write_string(self)
    }

    fn read_value<T: InputTransport>(r: &mut CompactReader<T>, _: &'static str) -> Result<Self> {
        r.read_string()
    }
}

impl WireValue for i32 {
    const TTYPE: TType = TType::I32;

    fn write_value<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        w.write_i32(*self)
    }

    fn read_value<T: InputTransport>(r: &mut CompactReader<T>, _: &'static str) -> Result<Self> {
        r.read_i32()
    }
}

impl WireValue for i64 {
    const TTYPE: TType = TType::I64;

    fn write_value<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        w.write_i64(*self)
    }

    fn read_value<T: InputTransport>(r: &mut CompactReader<T>, _: &'static str) -> Result<Self> {
        r.read_i64()
    }
}

impl<V: WireValue> WireValue for Vec<V> {
    const TTYPE: TType = TType::List;

    fn write_value<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        w.write_list_begin(V::TTYPE, self.len())?;
        for item in self {
            item.write_value(w)?;
        }
        w.write_list_end()
    }

    fn read_value<T: InputTransport>(
        r: &mut CompactReader<T>,
        field: &'static str,
    ) -> Result<Self> {
        let list = r.read_list_begin()?;
        if list.size > 0 && list.elem_type != V::TTYPE {
            return Err(CodecError::protocol(format!(
                "list '{field}' expected {:?} elements, got {:?}",
                V::TTYPE,
                list.elem_type
            )));
        }
        let mut items = Vec::with_capacity(list.size);
        for _ in 0..list.size {
            items.push(V::read_value(r, field)?);
        }
        r.read_list_end()?;
        Ok(items)
    }
}

/// Enum slots delegate to [`ThriftEnum`]
pub(crate) fn write_enum<E: ThriftEnum, T: OutputTransport>(
    value: E,
    w: &mut CompactWriter<T>,
) -> Result<()> {
    w.write_i32(value.value())
}

pub(crate) fn read_enum_value<E: ThriftEnum, T: InputTransport>(
    r: &mut CompactReader<T>,
    field: &'static str,
) -> Result<E> {
    read_enum(r, field)
}

/// Struct slots delegate to [`ThriftStruct`]
pub(crate) fn write_nested<S: ThriftStruct, T: OutputTransport>(
    value: &S,
    w: &mut CompactWriter<T>,
) -> Result<()> {
    value.write(w)
}

pub(crate) fn read_nested<S: ThriftStruct, T: InputTransport>(
    r: &mut CompactReader<T>,
) -> Result<S> {
    S::read(r)
}

pub(crate) fn write_field<V: WireValue, T: OutputTransport>(
    w: &mut CompactWriter<T>,
    name: &'static str,
    id: i16,
    value: &V,
) -> Result<()> {
    w.write_field_begin(name, id, V::TTYPE)?;
    value.write_value(w)?;
    w.write_field_end()
}

/// Absent optionals are omitted from the wire entirely
pub(crate) fn write_opt_field<V: WireValue, T: OutputTransport>(
    w: &mut CompactWriter<T>,
    name: &'static str,
    id: i16,
    value: &Option<V>,
) -> Result<()> {
    match value {
        Some(value) => write_field(w, name, id, value),
        None => Ok(()),
    }
}

/// Fill `slot` when the wire type matches, otherwise skip the value
pub(crate) fn read_field_into<V: WireValue, T: InputTransport>(
    r: &mut CompactReader<T>,
    field: &FieldMetadata,
    name: &'static str,
    slot: &mut Option<V>,
) -> Result<()> {
    if field.ttype == V::TTYPE {
        *slot = Some(V::read_value(r, name)?);
        Ok(())
    } else {
        skip(r, field.ttype)
    }
}

/// Write a struct envelope around `body`
pub(crate) fn write_struct<T, F>(w: &mut CompactWriter<T>, name: &'static str, body: F) -> Result<()>
where
    T: OutputTransport,
    F: FnOnce(&mut CompactWriter<T>) -> Result<()>,
{
    w.write_struct_begin(name)?;
    body(w)?;
    w.write_field_stop()?;
    w.write_struct_end()
}

/// Drive the field loop of a struct, handing each non-stop field to `on_field`
pub(crate) fn read_struct<T, F>(r: &mut CompactReader<T>, mut on_field: F) -> Result<()>
where
    T: InputTransport,
    F: FnMut(&mut CompactReader<T>, &FieldMetadata) -> Result<()>,
{
    r.read_struct_begin()?;
    loop {
        let field = r.read_field_begin()?;
        if field.is_stop() {
            break;
        }
        on_field(r, &field)?;
        r.read_field_end()?;
    }
    r.read_struct_end()
}
