//! Convenient glob import.
//!
//! ```rust
//! use snmp_lenient::prelude::*;
//!
//! let mut dec = Decoder::from_slice(&[0x02, 0x01, 0x2A]);
//! assert_eq!(Integer64::decode(&mut dec).unwrap().value(), 42);
//! ```

pub use crate::ber::{Decoder, IntegerPolicy};
pub use crate::error::{Error, Result};
pub use crate::oid;
pub use crate::oid::Oid;
pub use crate::timer::{TaskState, TimerService, TimerTask};
pub use crate::value::{Integer32, Integer64};
