//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.

use crate::error::{DecodeErrorKind, Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Uses SmallVec to avoid
/// heap allocation for OIDs with 16 or fewer arcs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// ```
    /// use snmp_lenient::oid::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1]);
    /// assert_eq!(oid.len(), 4);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted string notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// Empty components are skipped, so a leading dot is accepted.
    ///
    /// ```
    /// use snmp_lenient::oid::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
    /// assert!(Oid::parse("1.3.x").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let arcs = s
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u32>().map_err(|_| Error::invalid_oid(s)))
            .collect::<Result<SmallVec<[u32; 16]>>>()?;
        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the arc at `index`.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.arcs.get(index).copied()
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.starts_with(&other.arcs)
    }

    /// Create a child OID by appending an arc.
    ///
    /// ```
    /// use snmp_lenient::oid::Oid;
    ///
    /// let if_index = Oid::parse("1.3.6.1.2.1.2.2.1.1").unwrap();
    /// assert_eq!(if_index.child(3).to_string(), "1.3.6.1.2.1.2.2.1.1.3");
    /// ```
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Append all arcs of `suffix`, as when building a table instance OID
    /// from a column and a row index.
    pub fn join(&self, suffix: &Oid) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.extend_from_slice(&suffix.arcs);
        Oid { arcs }
    }

    /// Encode to BER format.
    ///
    /// OID encoding (X.690 Section 8.19):
    /// - First two arcs encoded as (arc1 * 40) + arc2 using base-128
    /// - Remaining arcs encoded as base-128 variable length
    pub fn to_ber(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        let first = match self.arcs.as_slice() {
            [] => return bytes,
            [a] => a.wrapping_mul(40),
            [a, b, ..] => a.wrapping_mul(40).wrapping_add(*b),
        };
        encode_subidentifier(&mut bytes, first);
        for &arc in self.arcs.iter().skip(2) {
            encode_subidentifier(&mut bytes, arc);
        }
        bytes
    }

    /// Decode from BER format.
    ///
    /// Offsets in errors are relative to `data`. Enforces [`MAX_OID_LEN`].
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();
        let (first_subid, mut i) = decode_subidentifier(data, 0)?;

        match first_subid {
            0..40 => arcs.extend([0, first_subid]),
            40..80 => arcs.extend([1, first_subid - 40]),
            _ => arcs.extend([2, first_subid - 80]),
        }

        while i < data.len() {
            let (arc, next) = decode_subidentifier(data, i)?;
            arcs.push(arc);
            i = next;

            if arcs.len() > MAX_OID_LEN {
                return Err(Error::decode(
                    i,
                    DecodeErrorKind::OidTooLong {
                        count: arcs.len(),
                        max: MAX_OID_LEN,
                    },
                ));
            }
        }

        Ok(Self { arcs })
    }
}

/// Encode a subidentifier in base-128 variable length.
fn encode_subidentifier(bytes: &mut Vec<u8>, value: u32) {
    let groups = (32 - value.leading_zeros()).div_ceil(7).max(1);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
}

/// Decode a subidentifier starting at `start`, returning (value, next index).
fn decode_subidentifier(data: &[u8], start: usize) -> Result<(u32, usize)> {
    let mut value: u32 = 0;
    let mut i = start;

    loop {
        let Some(&byte) = data.get(i) else {
            return Err(Error::decode(i, DecodeErrorKind::InvalidOidEncoding));
        };
        i += 1;

        if value > (u32::MAX >> 7) {
            return Err(Error::decode(i, DecodeErrorKind::InvalidOidEncoding));
        }

        value = (value << 7) | u32::from(byte & 0x7F);

        if byte & 0x80 == 0 {
            return Ok((value, i));
        }
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from literal arcs.
///
/// ```
/// use snmp_lenient::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let oid = Oid::parse("1.3.6.1.4.1.9").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 4, 1, 9]);
        assert_eq!(oid.to_string(), "1.3.6.1.4.1.9");
        assert!(Oid::parse("").unwrap().is_empty());
        assert!(matches!(Oid::parse("1.-3"), Err(Error::InvalidOid(_))));
    }

    #[test]
    fn test_ber_encode() {
        assert_eq!(oid!(1, 3, 6, 1).to_ber(), vec![0x2B, 0x06, 0x01]);
        // 2.999 needs a two-byte first subidentifier (1079)
        assert_eq!(oid!(2, 999).to_ber(), vec![0x88, 0x37]);
        assert_eq!(oid!(1, 3, 0).to_ber(), vec![0x2B, 0x00]);
        assert!(Oid::empty().to_ber().is_empty());
    }

    #[test]
    fn test_ber_decode() {
        let oid = Oid::from_ber(&[0x2B, 0x06, 0x01, 0x04, 0x01, 0x81, 0xA4, 0x4B]).unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 4, 1, 21067]);
        assert_eq!(Oid::from_ber(&[0x88, 0x37]).unwrap(), oid!(2, 999));
    }

    #[test]
    fn test_ber_decode_truncated_subidentifier() {
        let err = Oid::from_ber(&[0x2B, 0x86]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                offset: 2,
                kind: DecodeErrorKind::InvalidOidEncoding
            }
        ));
    }

    #[test]
    fn test_ber_decode_overflow() {
        let err = Oid::from_ber(&[0x2B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                kind: DecodeErrorKind::InvalidOidEncoding,
                ..
            }
        ));
    }

    #[test]
    fn test_too_many_arcs() {
        let mut data = vec![0x2B];
        data.extend(std::iter::repeat_n(0x01, MAX_OID_LEN));
        assert!(matches!(
            Oid::from_ber(&data),
            Err(Error::Decode {
                kind: DecodeErrorKind::OidTooLong { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_join_and_ordering() {
        let column = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2);
        let row = oid!(7);
        let instance = column.join(&row);
        assert!(instance.starts_with(&column));
        assert_eq!(instance.get(10), Some(7));
        assert!(column < instance);
    }
}
