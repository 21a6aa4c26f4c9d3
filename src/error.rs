//! Error types for snmp-lenient.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type for decoding and scheduling
//! - [`DecodeErrorKind`] - Details for malformed BER input
//! - [`SchedulingErrorKind`] - Reasons a timer task could not be scheduled
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.
//!
//! # Error Handling Patterns
//!
//! Decoder errors always reach the caller. The message parser that owns the
//! cursor is expected to abandon the enclosing PDU:
//!
//! ```
//! use snmp_lenient::ber::Decoder;
//! use snmp_lenient::Error;
//!
//! let mut dec = Decoder::from_slice(&[0x04, 0x01, 0x00]);
//! match dec.read_integer() {
//!     Err(Error::TagMismatch { tag, offset }) => {
//!         assert_eq!(tag, 0x04);
//!         assert_eq!(offset, 1);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::io;

use crate::format::hex::HexDecodeError;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Integer content longer than the active policy allows.
    IntegerTooLong { length: usize, max: usize },
    /// Invalid OID encoding.
    InvalidOidEncoding,
    /// OID has more sub-identifiers than allowed.
    OidTooLong { count: usize, max: usize },
    /// NULL with non-zero length.
    InvalidNull,
    /// Length field too long.
    LengthTooLong { octets: usize },
    /// Length exceeds maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// TLV extends past end of data.
    TlvOverflow,
    /// `reset` called without a preceding `mark`.
    NoMark,
    /// Constructed values nested deeper than the walker allows.
    NestingTooDeep { max: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerTooLong { length, max } => {
                write!(f, "integer of {} bytes exceeds limit of {} bytes", length, max)
            }
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} arcs, maximum is {}", count, max)
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::TlvOverflow => write!(f, "TLV extends past end of data"),
            Self::NoMark => write!(f, "no mark set on decoder"),
            Self::NestingTooDeep { max } => {
                write!(f, "constructed nesting exceeds {} levels", max)
            }
        }
    }
}

/// Reasons a timer task could not be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingErrorKind {
    /// The task has already been scheduled or was cancelled.
    AlreadyScheduled,
    /// The shard thread is no longer accepting work.
    ShardStopped,
    /// A repeating schedule was requested with a zero period.
    NonPositivePeriod,
    /// The requested delay does not fit the monotonic clock.
    DelayOutOfRange,
}

impl std::fmt::Display for SchedulingErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyScheduled => write!(f, "task already scheduled or cancelled"),
            Self::ShardStopped => write!(f, "timer shard has stopped"),
            Self::NonPositivePeriod => write!(f, "non-positive period"),
            Self::DelayOutOfRange => write!(f, "delay out of range"),
        }
    }
}

/// The main error type for all snmp-lenient operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Tag byte is not one of the integer-like tags.
    ///
    /// `offset` is the cursor position immediately after the tag byte.
    #[error("Wrong ASN.1 type. Not an integer: {tag} at position {offset}")]
    TagMismatch { tag: u8, offset: usize },

    /// Input ended in the middle of a value.
    #[error("truncated input at position {offset}: {source}")]
    TruncatedInput {
        offset: usize,
        #[source]
        source: io::Error,
    },

    /// Malformed BER structure.
    #[error("decode error at position {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// A timer task could not be scheduled.
    #[error("failed to schedule task on shard {shard}: {kind}")]
    Scheduling {
        shard: usize,
        kind: SchedulingErrorKind,
    },

    /// A timer shard thread could not be started.
    #[error("failed to start timer thread {name}: {source}")]
    ThreadSpawn {
        name: Box<str>,
        #[source]
        source: io::Error,
    },

    /// Invalid OID format.
    #[error("invalid OID: {0}")]
    InvalidOid(Box<str>),

    /// Invalid hex input.
    #[error("invalid hex input: {0}")]
    Hex(#[from] HexDecodeError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl Error {
    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create a truncated-input error for the given offset.
    pub fn truncated(offset: usize) -> Self {
        Self::TruncatedInput {
            offset,
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of input"),
        }
    }

    /// Create a scheduling error.
    pub fn scheduling(shard: usize, kind: SchedulingErrorKind) -> Self {
        Self::Scheduling { shard, kind }
    }

    /// Create an invalid OID error.
    pub fn invalid_oid(input: impl Into<String>) -> Self {
        Self::InvalidOid(input.into().into_boxed_str())
    }

    /// Whether this error was caused by running out of input.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }

    /// Whether this error was caused by a non-integer tag.
    pub fn is_tag_mismatch(&self) -> bool {
        matches!(self, Self::TagMismatch { .. })
    }

    /// Byte position associated with a decode failure, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::TagMismatch { offset, .. }
            | Self::TruncatedInput { offset, .. }
            | Self::Decode { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_mismatch_message() {
        let err = Error::TagMismatch { tag: 4, offset: 17 };
        assert_eq!(
            err.to_string(),
            "Wrong ASN.1 type. Not an integer: 4 at position 17"
        );
    }

    #[test]
    fn tag_mismatch_message_high_tag_is_unsigned() {
        let err = Error::TagMismatch { tag: 0x82, offset: 3 };
        assert_eq!(
            err.to_string(),
            "Wrong ASN.1 type. Not an integer: 130 at position 3"
        );
        let err = Error::TagMismatch { tag: 0xA2, offset: 20 };
        assert_eq!(
            err.to_string(),
            "Wrong ASN.1 type. Not an integer: 162 at position 20"
        );
    }

    #[test]
    fn truncated_is_io_class() {
        let err = Error::truncated(3);
        assert!(err.is_truncated());
        assert_eq!(err.offset(), Some(3));
        match err {
            Error::TruncatedInput { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected TruncatedInput, got {:?}", other),
        }
    }

    #[test]
    fn scheduling_has_no_offset() {
        let err = Error::scheduling(2, SchedulingErrorKind::AlreadyScheduled);
        assert_eq!(err.offset(), None);
        assert_eq!(
            err.to_string(),
            "failed to schedule task on shard 2: task already scheduled or cancelled"
        );
    }
}
