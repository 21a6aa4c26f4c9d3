//! Hexadecimal encoding and decoding utilities.

use std::fmt;

/// Encode bytes as lowercase hex string.
///
/// # Examples
///
/// ```
/// use snmp_lenient::format::hex::encode;
///
/// assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// assert_eq!(encode(&[0x00, 0xff]), "00ff");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Encode bytes as a colon-separated dump (`30:81:99`).
///
/// ```
/// use snmp_lenient::format::hex::encode_separated;
///
/// assert_eq!(encode_separated(&[0x30, 0x81, 0x99]), "30:81:99");
/// ```
pub fn encode_separated(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Decode a plain hex stream to bytes.
///
/// Returns an error for invalid hex characters or odd-length strings.
///
/// # Examples
///
/// ```
/// use snmp_lenient::format::hex::decode;
///
/// assert_eq!(decode("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
/// assert_eq!(decode("00FF").unwrap(), vec![0x00, 0xff]);
/// assert!(decode("xyz").is_err());
/// assert!(decode("abc").is_err()); // odd length
/// ```
pub fn decode(s: &str) -> Result<Vec<u8>, HexDecodeError> {
    if !s.len().is_multiple_of(2) {
        return Err(HexDecodeError::OddLength);
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            s.get(i..i + 2)
                .ok_or(HexDecodeError::InvalidChar)
                .and_then(digit_pair)
        })
        .collect()
}

/// Two ASCII hex digits to a byte. `from_str_radix` alone would also take a
/// sign.
fn digit_pair(pair: &str) -> Result<u8, HexDecodeError> {
    if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HexDecodeError::InvalidChar);
    }
    u8::from_str_radix(pair, 16).map_err(|_| HexDecodeError::InvalidChar)
}

/// Decode a colon-separated dump (`30:81:99`) to bytes.
///
/// Every group must be exactly two hex digits.
pub fn decode_separated(s: &str) -> Result<Vec<u8>, HexDecodeError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(':')
        .map(|group| {
            if group.len() != 2 {
                return Err(HexDecodeError::BadGroup);
            }
            digit_pair(group)
        })
        .collect()
}

/// Decode either dump format, ignoring surrounding whitespace.
///
/// Input containing a `:` is treated as a colon-separated dump, anything
/// else as a plain hex stream.
pub fn parse_dump(s: &str) -> Result<Vec<u8>, HexDecodeError> {
    let s = s.trim();
    if s.contains(':') {
        decode_separated(s)
    } else {
        decode(s)
    }
}

/// Error type for hex decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexDecodeError {
    /// Input has odd length (must be pairs of hex digits)
    OddLength,
    /// Invalid hexadecimal character
    InvalidChar,
    /// A colon-separated group was not two digits wide
    BadGroup,
}

impl fmt::Display for HexDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength => write!(f, "odd number of hex digits"),
            Self::InvalidChar => write!(f, "invalid hex character"),
            Self::BadGroup => write!(f, "separated group must be two hex digits"),
        }
    }
}

impl std::error::Error for HexDecodeError {}

/// Lazy hex formatter - only formats when actually displayed.
///
/// This avoids allocation when logging at disabled levels.
///
/// # Examples
///
/// ```
/// use snmp_lenient::format::hex::Bytes;
///
/// let data = [0xde, 0xad, 0xbe, 0xef];
/// let formatted = format!("{}", Bytes(&data));
/// assert_eq!(formatted, "deadbeef");
/// ```
pub struct Bytes<'a>(pub &'a [u8]);

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
