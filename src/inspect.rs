//! BER message inspection.
//!
//! [`Inspector`] walks a captured message (raw bytes or a hex dump) and
//! flattens it into a list of [`Node`]s, recursing into constructed tags
//! up to [`MAX_DEPTH`] levels. Integer primitives are held to the length
//! ceiling of the inspector's [`IntegerPolicy`] and then wide-decoded, so a
//! dump can be checked against the strict and the relaxed rules side by side.
//!
//! ```
//! use snmp_lenient::ber::IntegerPolicy;
//! use snmp_lenient::inspect::{Inspector, NodeContent};
//!
//! let inspection = Inspector::new(IntegerPolicy::RELAXED)
//!     .inspect_hex("30:03:02:01:2a")
//!     .unwrap();
//! assert!(inspection.is_complete());
//! assert_eq!(inspection.nodes[1].content, NodeContent::Integer(42));
//! ```

use std::fmt;

use bytes::Bytes;

use crate::ber::{Decoder, IntegerPolicy, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::format::hex;
use crate::oid::Oid;

/// Deepest constructed nesting the walker follows.
pub const MAX_DEPTH: usize = 64;

/// Decoded content of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// INTEGER, Counter32 or TimeTicks, wide-decoded.
    Integer(i64),
    /// Gauge32 or Counter64.
    Unsigned(u64),
    /// OBJECT IDENTIFIER.
    Oid(Oid),
    /// OCTET STRING.
    OctetString(Bytes),
    /// NULL.
    Null,
    /// Constructed; its children follow at `depth + 1`.
    Constructed,
    /// Any other primitive, raw content.
    Other(Bytes),
}

/// One TLV in the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Absolute position of the tag byte.
    pub offset: usize,
    /// Nesting depth, 0 for top-level TLVs.
    pub depth: usize,
    pub tag: u8,
    /// Content length.
    pub length: usize,
    pub content: NodeContent,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}[{}] 0x{:02x} len={}",
            "",
            self.offset,
            self.tag,
            self.length,
            indent = self.depth * 2
        )?;
        match &self.content {
            NodeContent::Integer(v) => write!(f, " INTEGER {}", v),
            NodeContent::Unsigned(v) => write!(f, " UNSIGNED {}", v),
            NodeContent::Oid(oid) => write!(f, " OID {}", oid),
            NodeContent::OctetString(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) if !s.is_empty() && s.chars().all(|c| !c.is_control()) => {
                    write!(f, " OCTET STRING {:?}", s)
                }
                _ => write!(f, " OCTET STRING {}", hex::Bytes(bytes)),
            },
            NodeContent::Null => write!(f, " NULL"),
            NodeContent::Constructed => Ok(()),
            NodeContent::Other(bytes) => write!(f, " {}", hex::Bytes(bytes)),
        }
    }
}

/// Result of a walk: every node decoded before the walk stopped, and the
/// error that stopped it, if any.
#[derive(Debug)]
pub struct Inspection {
    pub nodes: Vec<Node>,
    pub error: Option<Error>,
}

impl Inspection {
    /// Whether the whole input decoded.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Integer values in message order.
    pub fn integers(&self) -> impl Iterator<Item = i64> + '_ {
        self.nodes.iter().filter_map(|node| match node.content {
            NodeContent::Integer(v) => Some(v),
            _ => None,
        })
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        if let Some(err) = &self.error {
            writeln!(f, "error: {}", err)?;
        }
        Ok(())
    }
}

/// Walks BER messages under a fixed integer policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inspector {
    policy: IntegerPolicy,
}

impl Inspector {
    pub fn new(policy: IntegerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> IntegerPolicy {
        self.policy
    }

    /// Walk a message.
    pub fn inspect(&self, data: impl Into<Bytes>) -> Inspection {
        let mut decoder = Decoder::with_policy(data.into(), self.policy);
        let mut nodes = Vec::new();
        let error = walk(&mut decoder, 0, &mut nodes).err();
        if let Some(err) = &error {
            tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = err.offset(), nodes = nodes.len(), error = %err }, "inspection stopped");
        }
        Inspection { nodes, error }
    }

    /// Walk a message given as a hex dump, plain (`3003...`) or
    /// colon-separated (`30:03:...`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hex`] if the dump itself is malformed. Decoding
    /// problems are reported in the returned [`Inspection`].
    pub fn inspect_hex(&self, dump: &str) -> Result<Inspection> {
        let data = hex::parse_dump(dump)?;
        Ok(self.inspect(data))
    }
}

fn walk(decoder: &mut Decoder, depth: usize, nodes: &mut Vec<Node>) -> Result<()> {
    while !decoder.is_empty() {
        let offset = decoder.offset();
        decoder.mark();
        let tag = decoder.read_tag()?;
        let length = decoder.read_length()?;

        if tag::is_constructed(tag) {
            if depth >= MAX_DEPTH {
                tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = offset, depth }, "nesting too deep");
                return Err(Error::decode(
                    offset,
                    DecodeErrorKind::NestingTooDeep { max: MAX_DEPTH },
                ));
            }
            let mut inner = decoder.sub_decoder(length)?;
            nodes.push(Node {
                offset,
                depth,
                tag,
                length,
                content: NodeContent::Constructed,
            });
            walk(&mut inner, depth + 1, nodes)?;
            continue;
        }

        let content = match tag {
            t if tag::is_integer_like(t) => {
                if let Some(max) = decoder.policy().exceeded_by(length) {
                    tracing::debug!(target: "snmp_lenient::ber", { snmp.offset = decoder.offset(), length, max }, "integer too long");
                    return Err(Error::decode(
                        decoder.offset(),
                        DecodeErrorKind::IntegerTooLong { length, max },
                    ));
                }
                decoder.reset()?;
                NodeContent::Integer(decoder.read_integer64()?)
            }
            t if tag::is_unsigned_like(t) => {
                decoder.reset()?;
                NodeContent::Unsigned(decoder.read_unsigned64()?)
            }
            tag::universal::OBJECT_IDENTIFIER => NodeContent::Oid(decoder.read_oid_value(length)?),
            tag::universal::OCTET_STRING => NodeContent::OctetString(decoder.read_bytes(length)?),
            tag::universal::NULL => {
                decoder.reset()?;
                decoder.read_null()?;
                NodeContent::Null
            }
            _ => NodeContent::Other(decoder.read_bytes(length)?),
        };
        nodes.push(Node {
            offset,
            depth,
            tag,
            length,
            content,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `levels` SEQUENCEs nested inside each other, long-form lengths.
    fn nested_sequences(levels: usize) -> Bytes {
        let mut out = Vec::with_capacity(levels * 4);
        for level in 0..levels {
            let len = ((levels - level - 1) * 4) as u16;
            out.extend_from_slice(&[0x30, 0x82]);
            out.extend_from_slice(&len.to_be_bytes());
        }
        Bytes::from(out)
    }

    #[test]
    fn flat_sequence() {
        let inspection = Inspector::default().inspect(Bytes::from_static(&[
            0x30, 0x08, 0x02, 0x01, 0xFF, 0x05, 0x00, 0x04, 0x01, 0x41,
        ]));
        assert!(inspection.is_complete());
        let contents: Vec<_> = inspection.nodes.iter().map(|n| &n.content).collect();
        assert_eq!(
            contents,
            vec![
                &NodeContent::Constructed,
                &NodeContent::Integer(-1),
                &NodeContent::Null,
                &NodeContent::OctetString(Bytes::from_static(b"A")),
            ]
        );
        assert_eq!(inspection.nodes[2].offset, 5);
        assert_eq!(inspection.nodes[2].depth, 1);
    }

    #[test]
    fn unsigned_tags() {
        let inspection = Inspector::default().inspect(Bytes::from_static(&[
            0x42, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
        ]));
        assert_eq!(
            inspection.nodes[0].content,
            NodeContent::Unsigned(0xFFFF_FFFF)
        );
    }

    #[test]
    fn stops_at_first_error_keeping_prefix() {
        // second integer is truncated
        let inspection =
            Inspector::default().inspect(Bytes::from_static(&[0x02, 0x01, 0x07, 0x02, 0x03, 0x01]));
        assert_eq!(inspection.nodes.len(), 1);
        assert_eq!(inspection.nodes[0].content, NodeContent::Integer(7));
        assert!(inspection.error.as_ref().unwrap().is_truncated());
    }

    #[test]
    fn over_long_unsigned_depends_on_policy() {
        let data = Bytes::from_static(&[
            0x02, 0x0A, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A,
        ]);
        let strict = Inspector::new(IntegerPolicy::STRICT).inspect(data.clone());
        assert!(matches!(
            strict.error,
            Some(Error::Decode {
                kind: DecodeErrorKind::IntegerTooLong { .. },
                ..
            })
        ));
        assert!(strict.nodes.is_empty());

        let relaxed = Inspector::new(IntegerPolicy::RELAXED).inspect(data);
        assert!(relaxed.is_complete());
        assert_eq!(
            relaxed.nodes[0].content,
            NodeContent::Integer(0x0304_0506_0708_090A)
        );
    }

    #[test]
    fn strict_ceiling_applies_to_integer_nodes() {
        let data = Bytes::from_static(&[0x30, 0x07, 0x02, 0x05, 0x00, 0xAE, 0x7A, 0xD9, 0x00]);
        let strict = Inspector::new(IntegerPolicy::STRICT).inspect(data.clone());
        assert!(matches!(
            strict.error,
            Some(Error::Decode {
                offset: 4,
                kind: DecodeErrorKind::IntegerTooLong { length: 5, max: 4 },
            })
        ));
        assert_eq!(strict.nodes.len(), 1);

        let relaxed = Inspector::new(IntegerPolicy::RELAXED).inspect(data);
        assert!(relaxed.is_complete());
        assert_eq!(relaxed.nodes[1].content, NodeContent::Integer(2_927_286_528));
    }

    #[test]
    fn deep_nesting_is_an_error() {
        // one UDP datagram's worth of nested SEQUENCEs
        let inspection = Inspector::default().inspect(nested_sequences(16_000));
        assert!(matches!(
            inspection.error,
            Some(Error::Decode {
                offset: 256,
                kind: DecodeErrorKind::NestingTooDeep { max: MAX_DEPTH },
            })
        ));
        assert_eq!(inspection.nodes.len(), MAX_DEPTH);
        assert_eq!(inspection.nodes.last().unwrap().depth, MAX_DEPTH - 1);
    }

    #[test]
    fn nesting_at_limit_is_walked() {
        let inspection = Inspector::default().inspect(nested_sequences(MAX_DEPTH));
        assert!(inspection.is_complete());
        assert_eq!(inspection.nodes.len(), MAX_DEPTH);
    }

    #[test]
    fn bad_hex_is_an_error() {
        assert!(matches!(
            Inspector::default().inspect_hex("30:3"),
            Err(Error::Hex(hex::HexDecodeError::BadGroup))
        ));
    }

    #[test]
    fn display_indents_by_depth() {
        let inspection = Inspector::default().inspect_hex("3003020105").unwrap();
        let text = inspection.to_string();
        assert_eq!(text, "[0] 0x30 len=3\n  [2] 0x02 len=1 INTEGER 5\n");
    }
}
