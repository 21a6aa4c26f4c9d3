//! BER tag definitions for SNMP.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 31 for long form)

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Universal tags (class bits 00)
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30; // Constructed
}

/// Application tags (class bits 01) - SNMP-specific types
pub mod application {
    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    pub const GAUGE32: u8 = 0x42; // Also Unsigned32
    pub const TIMETICKS: u8 = 0x43;
    pub const OPAQUE: u8 = 0x44;
    pub const COUNTER64: u8 = 0x46;
}

/// Tags accepted by the signed integer decoders.
pub const INTEGER_LIKE: [u8; 3] = [
    universal::INTEGER,
    application::TIMETICKS,
    application::COUNTER32,
];

/// Tags accepted by the unsigned integer decoder.
pub const UNSIGNED_LIKE: [u8; 5] = [
    universal::INTEGER,
    application::COUNTER32,
    application::GAUGE32,
    application::TIMETICKS,
    application::COUNTER64,
];

/// Check if a tag is decodable as a signed integer.
#[inline]
pub const fn is_integer_like(tag: u8) -> bool {
    matches!(
        tag,
        universal::INTEGER | application::TIMETICKS | application::COUNTER32
    )
}

/// Check if a tag is decodable as an unsigned integer.
#[inline]
pub const fn is_unsigned_like(tag: u8) -> bool {
    is_integer_like(tag) || matches!(tag, application::GAUGE32 | application::COUNTER64)
}

/// Check if a tag indicates a constructed type
#[inline]
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED != 0
}
