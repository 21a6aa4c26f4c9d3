//! # snmp-lenient
//!
//! Two pieces an SNMP client needs on top of its protocol stack when talking
//! to real-world agents:
//!
//! - A BER integer decoder that can accept integers longer than four octets,
//!   selected per decoder through [`IntegerPolicy`]. Some agents pad small
//!   values or send unsigned 32-bit counters as five-octet INTEGERs.
//! - A sharded timer service that runs per-request timeout and retry
//!   callbacks on a small, fixed pool of threads instead of one timer per
//!   client.
//!
//! ## Decoding
//!
//! ```rust
//! use snmp_lenient::{Decoder, Integer64, IntegerPolicy};
//! use bytes::Bytes;
//!
//! let raw = Bytes::from_static(&[0x02, 0x05, 0x00, 0xAE, 0x7A, 0xD9, 0x00]);
//! let mut dec = Decoder::with_policy(raw, IntegerPolicy::RELAXED);
//! assert_eq!(Integer64::decode(&mut dec)?.value(), 2_927_286_528);
//! # Ok::<(), snmp_lenient::Error>(())
//! ```
//!
//! ## Timers
//!
//! ```rust
//! use snmp_lenient::{TaskState, TimerService, TimerTask};
//! use std::time::Duration;
//!
//! let service = TimerService::builder().shard_count(2).build()?;
//! let task = TimerTask::new(|| println!("request timed out"));
//! service.schedule(&task, Duration::from_secs(5))?;
//! assert_eq!(task.state(), TaskState::Scheduled);
//!
//! // response arrived
//! assert!(task.cancel());
//! # Ok::<(), snmp_lenient::Error>(())
//! ```

pub mod ber;
pub mod error;
pub mod format;
pub mod inspect;
pub mod oid;
pub mod prelude;
pub mod timer;
pub mod value;

// Re-exports for convenience
pub use ber::{Decoder, EncodeBuf, IntegerPolicy};
pub use error::{DecodeErrorKind, Error, Result, SchedulingErrorKind};
pub use inspect::{Inspection, Inspector, Node, NodeContent};
pub use oid::Oid;
pub use timer::{TaskState, TimerConfig, TimerService, TimerServiceBuilder, TimerTask};
pub use value::{Integer32, Integer64};
