//! Formatting utilities for raw SNMP data.
//!
//! ## Hex Encoding
//!
//! The [`hex`] module converts between bytes and the two textual dump
//! formats seen when debugging agents: a plain hex stream (as copied from a
//! packet capture) and a colon-separated dump (as printed by SNMP stack logs).
//!
//! ```
//! use snmp_lenient::format::hex;
//!
//! // Encode bytes to hex string
//! assert_eq!(hex::encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
//!
//! // Either dump format parses to the same bytes
//! assert_eq!(hex::parse_dump("02:01:ff").unwrap(), hex::parse_dump("0201ff").unwrap());
//!
//! // Lazy formatting for logging
//! let data = [0x00, 0xff];
//! println!("{}", hex::Bytes(&data)); // prints: 00ff
//! ```

pub mod hex;
