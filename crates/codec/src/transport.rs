//! Byte transports underneath the protocol layer
//!
//! The protocol never touches buffers directly: it writes through an
//! [`OutputTransport`] and reads through an [`InputTransport`].

use bytes::{Buf, Bytes, BytesMut};

use crate::{CodecError, Result};

/// Byte sink the protocol writes into
pub trait OutputTransport {
    /// Append all of `buf`
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Flush buffered bytes, if the transport buffers
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Byte source the protocol reads from
pub trait InputTransport {
    /// Fill `buf` completely or fail with [`CodecError::UnexpectedEof`]
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Take the next `len` bytes
    fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        let mut out = vec![0u8; len];
        self.read_exact(&mut out)?;
        Ok(Bytes::from(out))
    }

    /// Bytes left to read
    fn remaining(&self) -> usize;
}

/// Growable in-memory output buffer
#[derive(Debug, Default)]
pub struct BufferTransport {
    buf: BytesMut,
}

impl BufferTransport {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with preallocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Freeze the written bytes
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl OutputTransport for BufferTransport {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.buf.extend_from_slice(buf);
        Ok(())
    }
}

impl OutputTransport for Vec<u8> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

/// Read cursor over an immutable byte buffer
#[derive(Debug, Clone)]
pub struct SliceTransport {
    buf: Bytes,
}

impl SliceTransport {
    /// Wrap a buffer without copying
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    /// Copy a borrowed slice into a new cursor
    pub fn from_slice(buf: &[u8]) -> Self {
        Self {
            buf: Bytes::copy_from_slice(buf),
        }
    }

    /// Unread bytes
    pub fn into_remaining(self) -> Bytes {
        self.buf
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(CodecError::UnexpectedEof {
                needed,
                available: self.buf.remaining(),
            });
        }
        Ok(())
    }
}

impl InputTransport for SliceTransport {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure(buf.len())?;
        self.buf.copy_to_slice(buf);
        Ok(())
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        Ok(self.buf.split_to(len))
    }

    fn remaining(&self) -> usize {
        self.buf.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_transport_collects_writes() {
        let mut out = BufferTransport::new();
        out.write_all(&[1, 2]).unwrap();
        out.write_all(&[3]).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.into_bytes().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_slice_transport_reads_in_order() {
        let mut input = SliceTransport::from_slice(&[1, 2, 3, 4]);
        let mut two = [0u8; 2];
        input.read_exact(&mut two).unwrap();
        assert_eq!(two, [1, 2]);
        assert_eq!(input.read_bytes(1).unwrap().as_ref(), &[3]);
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn test_slice_transport_eof() {
        let mut input = SliceTransport::from_slice(&[1]);
        let mut buf = [0u8; 4];
        let err = input.read_exact(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedEof {
                needed: 4,
                available: 1
            }
        ));
        // A failed read consumes nothing
        assert_eq!(input.remaining(), 1);
    }
}
