//! Zig-zag and varint primitives
//!
//! Varints carry 7 data bits per byte, least-significant group first, with
//! the high bit set on every byte except the last.

use crate::{CodecError, Result};

/// Size of the scratch buffer varints are encoded into
pub const MAX_VARINT_BYTES: usize = 16;

/// Longest valid encoding of a 32-bit varint
pub const MAX_VARINT32_LEN: usize = 5;

/// Longest valid encoding of a 64-bit varint
pub const MAX_VARINT64_LEN: usize = 10;

/// Map a signed 32-bit integer onto an unsigned one, small magnitudes first
#[inline]
pub fn zigzag_encode_32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`]
#[inline]
pub fn zigzag_decode_32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Map a signed 64-bit integer onto an unsigned one, small magnitudes first
#[inline]
pub fn zigzag_encode_64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode_64`]
#[inline]
pub fn zigzag_decode_64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Encode `value` into `buf`, returning the number of bytes used
pub fn encode_varint(value: u64, buf: &mut [u8; MAX_VARINT_BYTES]) -> Result<usize> {
    let mut n = value;
    for (i, slot) in buf.iter_mut().enumerate() {
        if n & !0x7F == 0 {
            *slot = n as u8;
            return Ok(i + 1);
        }
        *slot = (n as u8 & 0x7F) | 0x80;
        n >>= 7;
    }

    Err(CodecError::VarintOverflow {
        value,
        max: MAX_VARINT_BYTES,
    })
}

/// Decode a varint from the front of `bytes`, returning the value and bytes consumed
///
/// `max_len` bounds the encoding length (5 for 32-bit values, 10 for 64-bit);
/// larger values are capped at 10.
pub fn decode_varint(bytes: &[u8], max_len: usize) -> Result<(u64, usize)> {
    let max_len = max_len.min(MAX_VARINT64_LEN);
    let mut result: u64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if i >= max_len {
            break;
        }
        result |= u64::from(b & 0x7F) << (7 * i);
        if b & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    if bytes.len() < max_len {
        Err(CodecError::UnexpectedEof {
            needed: bytes.len() + 1,
            available: bytes.len(),
        })
    } else {
        Err(CodecError::protocol(format!(
            "varint longer than {max_len} bytes"
        )))
    }
}
