//! BER (Basic Encoding Rules) support.
//!
//! The decoder is a position-tracking cursor over a `Bytes` buffer. Integer
//! reads honour an [`IntegerPolicy`] so strict and lenient parsing are two
//! configurations of the same decoder.
//!
//! ```
//! use snmp_lenient::ber::{Decoder, IntegerPolicy};
//! use bytes::Bytes;
//!
//! // A five-octet INTEGER some agents send for small values
//! let raw = Bytes::from_static(&[0x02, 0x05, 0x00, 0x00, 0x00, 0x00, 0x2A]);
//!
//! let mut strict = Decoder::with_policy(raw.clone(), IntegerPolicy::STRICT);
//! assert!(strict.read_integer().is_err());
//!
//! let mut relaxed = Decoder::with_policy(raw, IntegerPolicy::RELAXED);
//! assert_eq!(relaxed.read_integer().unwrap(), 42);
//! ```

mod decode;
mod encode;
pub mod length;
mod policy;
pub mod tag;

pub use decode::Decoder;
pub use encode::EncodeBuf;
pub use policy::IntegerPolicy;
