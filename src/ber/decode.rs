//! BER decoding.
//!
//! Zero-copy decoding using `Bytes` to avoid allocations. Positions reported
//! by [`Decoder::offset`] and carried in errors are absolute within the
//! outermost buffer, also for decoders returned by [`Decoder::read_sequence`]
//! and friends.

use super::length::decode_length;
use super::policy::IntegerPolicy;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Significant octets that fit an unsigned 64-bit register.
const MAX_UNSIGNED64_OCTETS: usize = 8;

/// BER decoder that reads from a byte buffer.
pub struct Decoder {
    data: Bytes,
    pos: usize,
    base: usize,
    mark: Option<usize>,
    policy: IntegerPolicy,
}

impl Decoder {
    /// Create a new decoder from bytes using the default (relaxed) policy.
    pub fn new(data: Bytes) -> Self {
        Self::with_policy(data, IntegerPolicy::default())
    }

    /// Create a decoder with an explicit integer policy.
    pub fn with_policy(data: Bytes, policy: IntegerPolicy) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
            mark: None,
            policy,
        }
    }

    /// Create a decoder from a byte slice (copies the data).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// The integer policy in effect.
    pub fn policy(&self) -> IntegerPolicy {
        self.policy
    }

    /// Replace the integer policy.
    pub fn set_policy(&mut self, policy: IntegerPolicy) {
        self.policy = policy;
    }

    /// Get the current absolute offset.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Remember the current position for a later [`reset`](Self::reset).
    pub fn mark(&mut self) {
        self.mark = Some(self.pos);
    }

    /// Rewind to the last [`mark`](Self::mark).
    pub fn reset(&mut self) -> Result<()> {
        match self.mark {
            Some(pos) => {
                self.pos = pos;
                Ok(())
            }
            None => Err(Error::decode(self.offset(), DecodeErrorKind::NoMark)),
        }
    }

    /// Peek at the next byte without consuming it.
    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.peek_byte()
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let Some(&byte) = self.data.get(self.pos) else {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset() }, "truncated data: unexpected end of input");
            return Err(Error::truncated(self.offset()));
        };
        self.pos += 1;
        Ok(byte)
    }

    /// Read a tag byte.
    pub fn read_tag(&mut self) -> Result<u8> {
        self.read_byte()
    }

    /// Read a length.
    pub fn read_length(&mut self) -> Result<usize> {
        let rest = self.data.get(self.pos..).unwrap_or_default();
        let (len, consumed) = decode_length(rest, self.offset())?;
        self.pos += consumed;
        Ok(len)
    }

    /// Read raw bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        // saturating_add keeps an absurd length from wrapping past the check
        let end = self.pos.saturating_add(len);
        if end > self.data.len() {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset(), needed = len, available = self.remaining() }, "insufficient data");
            return Err(Error::truncated(self.offset()));
        }
        let bytes = self.data.slice(self.pos..end);
        self.pos = end;
        Ok(bytes)
    }

    /// Read and expect a specific tag, returning the content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let tag = self.read_tag()?;
        if tag != expected {
            let kind = DecodeErrorKind::UnexpectedTag {
                expected,
                actual: tag,
            };
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset() - 1, kind = %kind }, "unexpected tag");
            return Err(Error::decode(self.offset() - 1, kind));
        }
        self.read_length()
    }

    /// Read an integer-like tag and its length.
    fn read_integer_header(&mut self) -> Result<usize> {
        let tag = self.read_tag()?;
        if !tag::is_integer_like(tag) {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset(), tag }, "not an integer tag");
            return Err(Error::TagMismatch {
                tag,
                offset: self.offset(),
            });
        }
        self.read_length()
    }

    /// Reject zero-length content, which has no sign octet to extend.
    fn require_content(&self, len: usize) -> Result<()> {
        if len == 0 {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset() }, "zero-length integer");
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::ZeroLengthInteger,
            ));
        }
        Ok(())
    }

    /// Read a BER integer (signed, 32-bit).
    ///
    /// Accepts INTEGER, Counter32 and TimeTicks tags. Content longer than
    /// four octets is subject to the decoder's [`IntegerPolicy`].
    pub fn read_integer(&mut self) -> Result<i32> {
        let len = self.read_integer_header()?;
        self.read_integer_value(len)
    }

    /// Read integer value given the length.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i32> {
        self.require_content(len)?;
        if let Some(max) = self.policy.exceeded_by(len) {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset(), length = len, max }, "integer too long");
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::IntegerTooLong { length: len, max },
            ));
        }
        if len > 4 {
            tracing::warn!(target: "snmp_lenient::ber", { snmp.offset = self.offset(), length = len }, "accepting over-long integer, high-order octets wrap");
        }

        let bytes = self.read_bytes(len)?;
        Ok(fold_signed32(&bytes))
    }

    /// Read a BER integer into a 64-bit register.
    ///
    /// Content of up to four octets is sign-extended exactly like
    /// [`read_integer`](Self::read_integer). Longer content is re-read from
    /// the start of the primitive through [`read_unsigned64`](Self::read_unsigned64)
    /// and its bit pattern is returned. This sets the decoder's mark to the
    /// start of the primitive.
    pub fn read_integer64(&mut self) -> Result<i64> {
        self.mark();
        let len = self.read_integer_header()?;
        if len > 4 {
            self.reset()?;
            let value = self.read_unsigned64()?;
            return Ok(value as i64);
        }
        self.require_content(len)?;
        let bytes = self.read_bytes(len)?;
        Ok(fold_signed64(&bytes))
    }

    /// Read an unsigned integer (up to 64 bits).
    ///
    /// Accepts INTEGER, Counter32, Gauge32, TimeTicks and Counter64 tags.
    /// One leading zero octet is skipped. With a bounded policy more than
    /// eight significant octets are rejected, with the relaxed policy the
    /// high-order octets wrap.
    pub fn read_unsigned64(&mut self) -> Result<u64> {
        let tag = self.read_tag()?;
        if !tag::is_unsigned_like(tag) {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset(), tag }, "not an unsigned integer tag");
            return Err(Error::TagMismatch {
                tag,
                offset: self.offset(),
            });
        }
        let len = self.read_length()?;
        self.read_unsigned64_value(len)
    }

    /// Read unsigned 64-bit integer value given the length.
    pub fn read_unsigned64_value(&mut self, len: usize) -> Result<u64> {
        self.require_content(len)?;
        let significant = match self.peek_byte() {
            Some(0) if len > 1 => len - 1,
            _ => len,
        };
        if significant > MAX_UNSIGNED64_OCTETS {
            if self.policy.is_relaxed() {
                tracing::warn!(target: "snmp_lenient::ber", { snmp.offset = self.offset(), length = len }, "accepting over-long unsigned integer, high-order octets wrap");
            } else {
                tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset(), length = len }, "unsigned integer too long");
                return Err(Error::decode(
                    self.offset(),
                    DecodeErrorKind::IntegerTooLong {
                        length: len,
                        max: MAX_UNSIGNED64_OCTETS + 1,
                    },
                ));
            }
        }

        let bytes = self.read_bytes(len)?;
        Ok(bytes
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    /// Read a NULL.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        if len != 0 {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset() }, "NULL with non-zero length");
            return Err(Error::decode(self.offset(), DecodeErrorKind::InvalidNull));
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        self.read_oid_value(len)
    }

    /// Read an OID given a pre-read length.
    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let start = self.offset();
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes).map_err(|e| match e {
            Error::Decode { kind, .. } => Error::decode(start, kind),
            other => other,
        })
    }

    /// Read a SEQUENCE, returning a decoder for its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Read a constructed type with a specific tag, returning a decoder for its contents.
    pub fn read_constructed(&mut self, expected_tag: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected_tag)?;
        self.sub_decoder(len)
    }

    /// Skip a TLV (tag-length-value) without parsing.
    pub fn skip_tlv(&mut self) -> Result<()> {
        let _tag = self.read_tag()?;
        let len = self.read_length()?;
        let end = self.pos.saturating_add(len);
        if end > self.data.len() {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = self.offset() }, "TLV extends past end of data");
            return Err(Error::decode(self.offset(), DecodeErrorKind::TlvOverflow));
        }
        self.pos = end;
        Ok(())
    }

    /// Create a sub-decoder for a portion of the remaining data.
    ///
    /// The sub-decoder inherits the integer policy and reports absolute offsets.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let base = self.offset();
        let content = self.read_bytes(len)?;
        Ok(Decoder {
            data: content,
            pos: 0,
            base,
            mark: None,
            policy: self.policy,
        })
    }

    /// Get the underlying bytes for the entire buffer.
    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    /// Get remaining data as a slice.
    pub fn remaining_slice(&self) -> &[u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }
}

/// Fold big-endian content into an `i32`, sign-extending from the first octet.
///
/// Content longer than four octets shifts the leading octets out of the
/// register, leaving the trailing four.
fn fold_signed32(content: &[u8]) -> i32 {
    let init: i32 = match content.first() {
        Some(b) if b & 0x80 != 0 => -1,
        _ => 0,
    };
    content
        .iter()
        .fold(init, |acc, &b| (acc << 8) | i32::from(b))
}

/// Fold big-endian content into an `i64`, sign-extending from the first octet.
fn fold_signed64(content: &[u8]) -> i64 {
    let init: i64 = match content.first() {
        Some(b) if b & 0x80 != 0 => -1,
        _ => 0,
    };
    content
        .iter()
        .fold(init, |acc, &b| (acc << 8) | i64::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integer() {
        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0x00]);
        assert_eq!(dec.read_integer().unwrap(), 0);

        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0x7F]);
        assert_eq!(dec.read_integer().unwrap(), 127);

        let mut dec = Decoder::from_slice(&[0x02, 0x02, 0x00, 0x80]);
        assert_eq!(dec.read_integer().unwrap(), 128);

        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0xFF]);
        assert_eq!(dec.read_integer().unwrap(), -1);

        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0x80]);
        assert_eq!(dec.read_integer().unwrap(), -128);
    }

    #[test]
    fn test_integer_like_tags() {
        let mut dec = Decoder::from_slice(&[0x43, 0x02, 0x01, 0x00]);
        assert_eq!(dec.read_integer().unwrap(), 256);

        let mut dec = Decoder::from_slice(&[0x41, 0x01, 0x05]);
        assert_eq!(dec.read_integer().unwrap(), 5);
    }

    #[test]
    fn test_tag_mismatch_reports_position_after_tag() {
        let mut dec = Decoder::from_slice(&[0x05, 0x00, 0x04, 0x01, 0x00]);
        dec.read_null().unwrap();
        let err = dec.read_integer().unwrap_err();
        match err {
            Error::TagMismatch { tag, offset } => {
                assert_eq!(tag, 0x04);
                assert_eq!(offset, 3);
            }
            other => panic!("expected TagMismatch, got {:?}", other),
        }
        assert_eq!(dec.offset(), 3);
    }

    #[test]
    fn test_relaxed_wraps_long_integer() {
        // Trailing four octets win once the leading ones shift out.
        let mut dec = Decoder::from_slice(&[0x02, 0x05, 0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(dec.read_integer().unwrap(), 0x02030405);
        assert!(dec.is_empty());

        let mut dec =
            Decoder::from_slice(&[0x02, 0x06, 0xFF, 0xFF, 0x80, 0x00, 0x00, 0x01]);
        assert_eq!(dec.read_integer().unwrap(), i32::MIN + 1);
    }

    #[test]
    fn test_strict_rejects_long_integer() {
        let data = Bytes::from_static(&[0x02, 0x05, 0x00, 0x80, 0x00, 0x00, 0x00]);
        let mut dec = Decoder::with_policy(data, IntegerPolicy::STRICT);
        let err = dec.read_integer().unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                offset: 2,
                kind: DecodeErrorKind::IntegerTooLong { length: 5, max: 4 }
            }
        ));
    }

    #[test]
    fn test_zero_length_integer_rejected() {
        let mut dec = Decoder::from_slice(&[0x02, 0x00]);
        assert!(matches!(
            dec.read_integer().unwrap_err(),
            Error::Decode {
                kind: DecodeErrorKind::ZeroLengthInteger,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_integer() {
        let mut dec = Decoder::from_slice(&[0x02, 0x03, 0x00, 0xb3]);
        let err = dec.read_integer().unwrap_err();
        assert!(err.is_truncated());

        let mut dec = Decoder::from_slice(&[]);
        assert!(dec.read_integer().unwrap_err().is_truncated());
    }

    #[test]
    fn test_cursor_advance() {
        // Long-form length: 1 tag + 2 length + 3 content
        let mut dec = Decoder::from_slice(&[0x02, 0x81, 0x03, 0x00, 0xb3, 0x94, 0x05, 0x00]);
        assert_eq!(dec.read_integer().unwrap(), 45972);
        assert_eq!(dec.offset(), 6);
        dec.read_null().unwrap();
    }

    #[test]
    fn test_integer64_short_path_sign_extends() {
        let mut dec = Decoder::from_slice(&[0x02, 0x04, 0x80, 0x00, 0x00, 0x00]);
        assert_eq!(dec.read_integer64().unwrap(), i64::from(i32::MIN));

        let mut dec = Decoder::from_slice(&[0x02, 0x04, 0x7F, 0xFF, 0xFF, 0xFF]);
        assert_eq!(dec.read_integer64().unwrap(), i64::from(i32::MAX));
    }

    #[test]
    fn test_integer64_long_path_is_unsigned() {
        let bytes = [0x02, 0x05, 0x80, 0x00, 0x00, 0x00, 0x00];
        let mut dec = Decoder::from_slice(&bytes);
        assert_eq!(dec.read_integer64().unwrap(), 0x80_0000_0000);
        assert!(dec.is_empty());

        let mut unsigned = Decoder::from_slice(&bytes);
        assert_eq!(unsigned.read_unsigned64().unwrap(), 0x80_0000_0000);
    }

    #[test]
    fn test_unsigned64_leading_zero() {
        let mut dec = Decoder::from_slice(&[
            0x46, 0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        ]);
        assert_eq!(dec.read_unsigned64().unwrap(), u64::MAX);
    }

    #[test]
    fn test_unsigned64_strict_rejects_nine_significant_octets() {
        let data = Bytes::from_static(&[
            0x46, 0x09, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);
        let mut dec = Decoder::with_policy(data.clone(), IntegerPolicy::STRICT);
        assert!(matches!(
            dec.read_unsigned64().unwrap_err(),
            Error::Decode {
                kind: DecodeErrorKind::IntegerTooLong { length: 9, .. },
                ..
            }
        ));

        let mut dec = Decoder::with_policy(data, IntegerPolicy::RELAXED);
        assert_eq!(dec.read_unsigned64().unwrap(), 0);
    }

    #[test]
    fn test_mark_reset() {
        let mut dec = Decoder::from_slice(&[0x01, 0x02, 0x03]);
        assert!(dec.reset().is_err());
        dec.read_byte().unwrap();
        dec.mark();
        dec.read_byte().unwrap();
        dec.read_byte().unwrap();
        dec.reset().unwrap();
        assert_eq!(dec.offset(), 1);
        assert_eq!(dec.read_byte().unwrap(), 0x02);
    }

    #[test]
    fn test_sub_decoder_absolute_offsets() {
        // SEQUENCE { NULL, OCTET STRING }
        let mut dec = Decoder::from_slice(&[0x30, 0x05, 0x05, 0x00, 0x04, 0x01, 0x41]);
        let mut seq = dec.read_sequence().unwrap();
        assert_eq!(seq.offset(), 2);
        seq.read_null().unwrap();
        let err = seq.read_integer().unwrap_err();
        assert!(matches!(err, Error::TagMismatch { tag: 0x04, offset: 5 }));
    }

    #[test]
    fn test_decode_sequence_of_integers() {
        let mut dec = Decoder::from_slice(&[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
        let mut seq = dec.read_sequence().unwrap();
        assert_eq!(seq.read_integer().unwrap(), 1);
        assert_eq!(seq.read_integer().unwrap(), 2);
        assert!(seq.is_empty());
    }

    #[test]
    fn test_skip_tlv_rejects_oversized_length() {
        let mut dec = Decoder::from_slice(&[0x04, 0x82, 0x01, 0x00, 0xAA, 0xBB, 0xCC]);
        assert!(matches!(
            dec.skip_tlv().unwrap_err(),
            Error::Decode {
                kind: DecodeErrorKind::TlvOverflow,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_oid() {
        let mut dec = Decoder::from_slice(&[0x06, 0x03, 0x2B, 0x06, 0x01]);
        let oid = dec.read_oid().unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    }
}
