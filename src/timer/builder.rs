//! Timer service builder.
//!
//! This module provides [`TimerServiceBuilder`], the entry point for
//! constructing a [`TimerService`] with a non-default shard count or thread
//! naming.

use crate::error::{Error, Result};

use super::TimerService;

/// Default number of shards.
pub const DEFAULT_SHARD_COUNT: usize = 4;

/// Default prefix for shard thread names.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "snmp-timer";

/// Resolved timer service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Number of shard threads.
    pub shard_count: usize,
    /// Shard threads are named `<prefix>-<index>`.
    pub thread_name_prefix: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl TimerConfig {
    /// Name of the thread backing shard `index`.
    pub fn thread_name(&self, index: usize) -> String {
        format!("{}-{}", self.thread_name_prefix, index)
    }
}

/// Builder for [`TimerService`].
///
/// # Example
///
/// ```rust
/// use snmp_lenient::timer::TimerService;
///
/// let service = TimerService::builder()
///     .shard_count(2)
///     .thread_name_prefix("poller-timer")
///     .build()
///     .unwrap();
/// assert_eq!(service.shard_count(), 2);
/// assert_eq!(service.shard_name(1), Some("poller-timer-1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimerServiceBuilder {
    config: TimerConfig,
}

impl TimerServiceBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards (default: 4).
    ///
    /// Zero falls back to the default.
    pub fn shard_count(mut self, count: usize) -> Self {
        self.config.shard_count = if count == 0 {
            DEFAULT_SHARD_COUNT
        } else {
            count
        };
        self
    }

    /// Set the shard thread name prefix (default: `"snmp-timer"`).
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Start the shard threads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a prefix containing a NUL byte (thread
    /// names cannot hold one) and [`Error::ThreadSpawn`] if the operating
    /// system refuses a thread.
    pub fn build(self) -> Result<TimerService> {
        if self.config.thread_name_prefix.contains('\0') {
            return Err(Error::Config(
                "thread name prefix contains a NUL byte".into(),
            ));
        }
        TimerService::from_config(self.config)
    }
}

impl From<TimerConfig> for TimerServiceBuilder {
    fn from(config: TimerConfig) -> Self {
        Self::default()
            .shard_count(config.shard_count)
            .thread_name_prefix(config.thread_name_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shards_falls_back() {
        let builder = TimerServiceBuilder::new().shard_count(0);
        assert_eq!(builder.config().shard_count, DEFAULT_SHARD_COUNT);
    }

    #[test]
    fn thread_names() {
        let config = TimerConfig {
            shard_count: 3,
            thread_name_prefix: "t".into(),
        };
        assert_eq!(config.thread_name(2), "t-2");
        assert_eq!(TimerConfig::default().thread_name(0), "snmp-timer-0");
    }

    #[test]
    fn from_config_normalises_zero() {
        let builder = TimerServiceBuilder::from(TimerConfig {
            shard_count: 0,
            thread_name_prefix: "x".into(),
        });
        assert_eq!(builder.config().shard_count, DEFAULT_SHARD_COUNT);
        assert_eq!(builder.config().thread_name_prefix, "x");
    }

    #[test]
    fn nul_prefix_rejected() {
        let err = TimerServiceBuilder::new()
            .thread_name_prefix("bad\0name")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
