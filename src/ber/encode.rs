//! BER encoding.
//!
//! [`EncodeBuf`] builds output back to front: content is pushed first, then
//! its length, then its tag. This avoids computing nested lengths up front.

use super::length::encode_length;
use super::tag;
use bytes::{Bytes, BytesMut};

/// Reverse-building BER encoder.
#[derive(Debug, Default)]
pub struct EncodeBuf {
    buf: BytesMut,
}

impl EncodeBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes pushed so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Push raw bytes (in forward order).
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buf.extend(data.iter().rev());
    }

    /// Push a tag byte.
    pub fn push_tag(&mut self, tag: u8) {
        self.buf.extend_from_slice(&[tag]);
    }

    /// Push a BER length.
    pub fn push_length(&mut self, len: usize) {
        let (bytes, n) = encode_length(len);
        self.buf.extend_from_slice(&bytes[..n]);
    }

    /// Push an INTEGER with minimal two's-complement content.
    pub fn push_integer(&mut self, value: i32) {
        self.push_integer_with_tag(tag::universal::INTEGER, value);
    }

    /// Push a signed 32-bit integer under an arbitrary tag.
    pub fn push_integer_with_tag(&mut self, tag: u8, value: i32) {
        let content = minimal_content(value);
        self.push_bytes(content.as_slice());
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// Finish encoding, returning the bytes in wire order.
    pub fn finish(self) -> Bytes {
        let mut out = self.buf;
        out.reverse();
        out.freeze()
    }
}

/// Minimal two's-complement content octets for `value`.
struct Content {
    bytes: [u8; 4],
    start: usize,
}

impl Content {
    fn as_slice(&self) -> &[u8] {
        &self.bytes[self.start..]
    }

    fn len(&self) -> usize {
        self.bytes.len() - self.start
    }
}

fn minimal_content(value: i32) -> Content {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    // Drop a leading octet while the next one still carries the same sign bit.
    while start < 3 {
        let lead = bytes[start];
        let next_high = bytes[start + 1] & 0x80;
        if (lead == 0x00 && next_high == 0) || (lead == 0xFF && next_high != 0) {
            start += 1;
        } else {
            break;
        }
    }
    Content { bytes, start }
}
