//! Shared test infrastructure for snmp-lenient.
//!
//! Captured packets and a tracing hook for integration tests.

// Not every test file uses every fixture
#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::{V2_RESPONSE_HEX, V3_REQUEST_HEX};

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per binary.
///
/// Set `RUST_LOG=snmp_lenient=debug` to see decoder and shard events.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
