//! # Codec
//!
//! Compact binary protocol codec (Thrift compact wire format).
//!
//! Layers, bottom-up:
//! - [`varint`]: zig-zag and unsigned varint primitives
//! - [`transport`]: byte sinks/sources the protocol reads from and writes to
//! - [`protocol`]: [`CompactWriter`] / [`CompactReader`] with delta-encoded
//!   field headers and deferred boolean headers
//! - [`skip`]: structural skipping of unknown fields
//! - [`ThriftStruct`] / [`ThriftEnum`]: the seams generated schema types plug into
//!
//! The codec keeps no state across calls; each writer/reader owns the cursor
//! state of the single encode or decode it performs.

mod error;
pub mod protocol;
pub mod skip;
mod traits;
pub mod transport;
mod ttype;
pub mod varint;

pub use error::{CodecError, Result};
pub use protocol::{
    CompactReader, CompactWriter, FieldMetadata, ListMetadata, MapMetadata, MessageMetadata,
    MessageType, SetMetadata,
};
pub use skip::skip;
pub use traits::{decode_struct, encode_struct, read_enum, required, ThriftEnum, ThriftStruct};
pub use transport::{BufferTransport, InputTransport, OutputTransport, SliceTransport};
pub use ttype::{compact, TType};

/// Media type for payloads encoded with this codec
pub const COMPACT_CONTENT_TYPE: &str = "application/vnd.apache.thrift.compact";
