//! BER length encoding and decoding.
//!
//! Length encoding follows X.690 Section 8.1.3:
//! - Short form: Single byte, bit 8=0, value 0-127
//! - Long form: Initial byte (bit 8=1, bits 7-1=count), followed by length bytes
//! - Indefinite form (0x80): Rejected per net-snmp behavior

use crate::error::{DecodeErrorKind, Error, Result};

/// Maximum length we'll accept (to prevent DoS).
///
/// 2MB is far larger than any realistic SNMP message. The relaxed integer
/// policy lifts the ceiling on integer *content*, not this structural cap.
pub const MAX_LENGTH: usize = 0x200000; // 2MB

/// Encode a length value into the buffer (returns bytes in reverse order for prepending)
///
/// Uses short form for lengths <= 127, long form otherwise.
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut buf = [0u8; 5];

    if len <= 127 {
        buf[0] = len as u8;
        (buf, 1)
    } else if len <= 0xFF {
        buf[0] = len as u8;
        buf[1] = 0x81;
        (buf, 2)
    } else if len <= 0xFFFF {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = 0x82;
        (buf, 3)
    } else if len <= 0xFFFFFF {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = (len >> 16) as u8;
        buf[3] = 0x83;
        (buf, 4)
    } else {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = (len >> 16) as u8;
        buf[3] = (len >> 24) as u8;
        buf[4] = 0x84;
        (buf, 5)
    }
}

/// Decode a length from bytes, returning (length, bytes_consumed)
///
/// The `base_offset` parameter is used to report error offsets correctly
/// when this is called from within a decoder.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::truncated(base_offset));
    };

    if first == 0x80 {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::IndefiniteLength,
        ));
    }

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let num_octets = (first & 0x7F) as usize;

    if num_octets > 4 {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthTooLong { octets: num_octets },
        ));
    }

    let Some(octets) = data.get(1..1 + num_octets) else {
        return Err(Error::truncated(base_offset + data.len()));
    };

    let len = octets
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);

    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, 1 + num_octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_form() {
        assert_eq!(decode_length(&[0], 0).unwrap(), (0, 1));
        assert_eq!(decode_length(&[127], 0).unwrap(), (127, 1));
    }

    #[test]
    fn test_long_form() {
        assert_eq!(decode_length(&[0x81, 128], 0).unwrap(), (128, 2));
        assert_eq!(decode_length(&[0x82, 0x01, 0x00], 0).unwrap(), (256, 3));
        // Non-minimal long form is accepted (X.690 8.1.3.5 Note 2)
        assert_eq!(decode_length(&[0x82, 0x00, 0x05], 0).unwrap(), (5, 3));
    }

    #[test]
    fn test_indefinite_rejected() {
        let err = decode_length(&[0x80], 7).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                offset: 7,
                kind: DecodeErrorKind::IndefiniteLength
            }
        ));
    }

    #[test]
    fn test_truncated_long_form() {
        let err = decode_length(&[0x82, 0x01], 10).unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(err.offset(), Some(12));

        assert!(decode_length(&[], 0).unwrap_err().is_truncated());
    }

    #[test]
    fn test_too_many_octets() {
        let err = decode_length(&[0x85, 0, 0, 0, 0, 1], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::LengthTooLong { octets: 5 },
                ..
            }
        ));
    }

    #[test]
    fn test_max_length_enforced() {
        let over = MAX_LENGTH + 1;
        let bytes = [
            0x83,
            ((over >> 16) & 0xFF) as u8,
            ((over >> 8) & 0xFF) as u8,
            (over & 0xFF) as u8,
        ];
        let err = decode_length(&bytes, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::LengthExceedsMax { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_encode() {
        let (buf, len) = encode_length(127);
        assert_eq!(&buf[..len], &[127]);

        let (buf, len) = encode_length(256);
        assert_eq!(&buf[..len], &[0, 1, 0x82]);
    }
}
