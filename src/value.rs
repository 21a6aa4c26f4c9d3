//! Integer variable types.
//!
//! [`Integer32`] and [`Integer64`] are the typed results handed to a
//! variable-binding model. Both decode through [`Decoder`], so the length
//! ceiling they tolerate is whatever [`IntegerPolicy`](crate::ber::IntegerPolicy)
//! the decoder carries.
//!
//! ```
//! use snmp_lenient::ber::Decoder;
//! use snmp_lenient::value::{Integer32, Integer64};
//!
//! let mut dec = Decoder::from_slice(&[0x02, 0x01, 0xFF, 0x02, 0x01, 0x80]);
//! assert_eq!(Integer32::decode(&mut dec).unwrap().value(), -1);
//! assert_eq!(Integer64::decode(&mut dec).unwrap().value(), -128);
//! ```

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Encoded size (tag, length and content) of a minimal INTEGER.
///
/// Values beyond the 24-bit range all report 6, which is exact for 32-bit
/// values and undercounts wider ones.
fn ber_length_of(value: i64) -> usize {
    if (-0x80..0x80).contains(&value) {
        3
    } else if (-0x8000..0x8000).contains(&value) {
        4
    } else if (-0x80_0000..0x80_0000).contains(&value) {
        5
    } else {
        6
    }
}

/// Signed 32-bit INTEGER.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Integer32(i32);

impl Integer32 {
    /// Create from a raw value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// The raw value.
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Decode from the cursor's current TLV.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        decoder.read_integer().map(Self)
    }

    /// Encode as a minimal INTEGER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_integer(self.0);
    }

    /// Encoded size in bytes.
    pub fn ber_length(&self) -> usize {
        ber_length_of(i64::from(self.0))
    }
}

impl From<i32> for Integer32 {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Integer32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Integer32 {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// INTEGER held in a 64-bit register.
///
/// Decoding accepts content longer than four octets by switching to the
/// unsigned path (see [`Decoder::read_integer64`]). Encoding, the size table
/// and the table sub-index all work on the low 32 bits, which is what agents
/// expect for INTEGER syntax.
///
/// Equality and hashing use the full 64-bit value. There is deliberately no
/// `Ord` implementation: [`compare_to`](Self::compare_to) orders by truncated
/// difference, which is not a total order for values more than 2^31 apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Integer64(i64);

impl Integer64 {
    /// Create from a raw value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw value.
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Replace the raw value.
    pub fn set_value(&mut self, value: i64) {
        self.0 = value;
    }

    /// Low 32 bits as a signed value.
    pub const fn to_int(&self) -> i32 {
        self.0 as i32
    }

    /// The raw value.
    pub const fn to_long(&self) -> i64 {
        self.0
    }

    /// Decode from the cursor's current TLV.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        decoder.read_integer64().map(Self)
    }

    /// Encode the low 32 bits as a minimal INTEGER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_integer(self.to_int());
    }

    /// Encode to a standalone buffer.
    pub fn to_ber(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        self.encode(&mut buf);
        buf.finish()
    }

    /// Encoded size in bytes: 3, 4, 5 or 6.
    ///
    /// The table stops at 6, so values outside the 32-bit range are
    /// undercounted.
    pub fn ber_length(&self) -> usize {
        ber_length_of(self.0)
    }

    /// Difference-based comparison, truncated to 32 bits.
    ///
    /// Negative, zero or positive like a comparator, but the sign is only
    /// meaningful when the two values are within 2^31 of each other.
    ///
    /// ```
    /// use snmp_lenient::value::Integer64;
    ///
    /// assert!(Integer64::new(1).compare_to(&Integer64::new(2)) < 0);
    /// // 2^32 apart truncates to zero
    /// assert_eq!(Integer64::new(1 << 32).compare_to(&Integer64::new(0)), 0);
    /// ```
    pub const fn compare_to(&self, other: &Self) -> i32 {
        self.0.wrapping_sub(other.0) as i32
    }

    /// Single-arc table index holding the low 32 bits.
    ///
    /// `implied_length` has no effect for a fixed-size syntax; it is accepted
    /// so all index components share one call shape.
    pub fn to_sub_index(&self, _implied_length: bool) -> Oid {
        Oid::from_slice(&[self.to_int() as u32])
    }

    /// Rebuild from a table index, reading the first arc as a signed 32-bit
    /// component.
    pub fn from_sub_index(sub_index: &Oid, _implied_length: bool) -> Result<Self> {
        let arc = sub_index
            .get(0)
            .ok_or_else(|| Error::invalid_oid("empty sub-index"))?;
        Ok(Self(i64::from(arc as i32)))
    }
}

impl From<i64> for Integer64 {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Integer64 {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl From<Integer32> for Integer64 {
    fn from(value: Integer32) -> Self {
        Self(i64::from(value.0))
    }
}

impl fmt::Display for Integer64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Integer64 {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
