//! Compact protocol writer and reader

mod metadata;
mod reader;
mod writer;

pub use metadata::{
    FieldMetadata, ListMetadata, MapMetadata, MessageMetadata, MessageType, SetMetadata,
};
pub use reader::CompactReader;
pub use writer::CompactWriter;

/// First byte of every compact protocol message
pub const PROTOCOL_ID: u8 = 0x82;
/// Compact protocol version
pub const VERSION: u8 = 1;
pub(crate) const VERSION_MASK: u8 = 0x1F;
pub(crate) const TYPE_MASK: u8 = 0xE0;
pub(crate) const TYPE_BITS: u8 = 0x07;
pub(crate) const TYPE_SHIFT_AMOUNT: u8 = 5;

/// Largest field-id delta that fits in a header nibble
pub(crate) const MAX_FIELD_DELTA: i32 = 15;
/// Largest collection size packed into the header nibble
pub(crate) const MAX_SHORT_COLLECTION: usize = 14;
