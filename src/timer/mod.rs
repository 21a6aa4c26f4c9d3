//! Sharded timer service.
//!
//! A fixed pool of timer threads ("shards"), each owning a private run queue.
//! Every task is routed to one shard by its identity hash and stays there, so
//! tasks with the same identity run in order on the same thread while
//! different shards fire concurrently.
//!
//! # Example
//!
//! ```rust
//! use std::sync::mpsc;
//! use std::time::Duration;
//! use snmp_lenient::timer::{TaskState, TimerService, TimerTask};
//!
//! let service = TimerService::new().unwrap();
//! let (tx, rx) = mpsc::channel();
//! let task = TimerTask::with_identity(0x4A0B_7030, move || {
//!     let _ = tx.send("timeout");
//! });
//!
//! service.schedule(&task, Duration::from_millis(10)).unwrap();
//! assert_eq!(task.state(), TaskState::Scheduled);
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "timeout");
//! ```

mod builder;
mod shard;
mod task;

pub use builder::{
    DEFAULT_SHARD_COUNT, DEFAULT_THREAD_NAME_PREFIX, TimerConfig, TimerServiceBuilder,
};
pub use task::{TaskState, TimerTask};

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant, SystemTime};

use crate::error::{Error, Result, SchedulingErrorKind};
use shard::{Recurrence, Shard, Submission};

static GLOBAL: OnceLock<TimerService> = OnceLock::new();

/// Shard index for an identity hash: `|hash % shard_count|`.
///
/// The remainder is taken before the absolute value, so `i32::MIN` routes
/// like any other hash.
///
/// ```
/// use snmp_lenient::timer::shard_index;
///
/// assert_eq!(shard_index(7, 4), 3);
/// assert_eq!(shard_index(-7, 4), 3);
/// assert_eq!(shard_index(i32::MIN, 4), 0);
/// ```
pub fn shard_index(identity_hash: i32, shard_count: usize) -> usize {
    if shard_count == 0 {
        return 0;
    }
    (i64::from(identity_hash) % shard_count as i64).unsigned_abs() as usize
}

struct Inner {
    shards: Vec<Shard>,
}

/// Handle to a pool of timer shards.
///
/// Cloning is cheap and every clone drives the same shards. When the last
/// handle is dropped the shards finish pending one-shot tasks, stop
/// re-arming repeating ones, and exit.
#[derive(Clone)]
pub struct TimerService {
    inner: Arc<Inner>,
}

impl TimerService {
    /// Start a service with the default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder.
    pub fn builder() -> TimerServiceBuilder {
        TimerServiceBuilder::new()
    }

    /// The process-wide service, started on first use.
    pub fn global() -> Result<&'static TimerService> {
        if let Some(service) = GLOBAL.get() {
            return Ok(service);
        }
        let service = Self::new()?;
        // A racing initialiser may win; the loser's shards exit once it drops.
        Ok(GLOBAL.get_or_init(|| service))
    }

    pub(crate) fn from_config(config: TimerConfig) -> Result<Self> {
        let count = if config.shard_count == 0 {
            DEFAULT_SHARD_COUNT
        } else {
            config.shard_count
        };
        let shards = (0..count)
            .map(|index| Shard::spawn(index, config.thread_name(index)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            inner: Arc::new(Inner { shards }),
        })
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.inner.shards.len()
    }

    /// Shard a task is routed to.
    pub fn shard_for(&self, task: &TimerTask) -> usize {
        shard_index(task.identity_hash(), self.shard_count())
    }

    /// Thread name of shard `index`.
    pub fn shard_name(&self, index: usize) -> Option<&str> {
        self.inner.shards.get(index).map(Shard::name)
    }

    /// Run `task` once after `delay`.
    ///
    /// The task is [`Scheduled`](TaskState::Scheduled) by the time this
    /// returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scheduling`] if the task was already submitted or
    /// cancelled, if the delay overflows the clock, or if the shard has
    /// stopped. A failed call leaves a fresh task unscheduled.
    pub fn schedule(&self, task: &TimerTask, delay: Duration) -> Result<()> {
        self.submit(task, delay, Recurrence::Once)
    }

    /// Run `task` after `delay`, then every `period` until cancelled.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn schedule_repeating(&self, task: &TimerTask, delay: Duration, period: Duration) {
        if let Err(err) = self.submit_repeating(task, delay, period) {
            tracing::warn!(target: "snmp_lenient::timer", { snmp.task = task.identity(), error = %err }, "failed to schedule repeating task");
        }
    }

    /// Run `task` at `first`, then every `period` until cancelled.
    ///
    /// A time already in the past fires as soon as possible. Failures are
    /// logged and otherwise ignored.
    pub fn schedule_at(&self, task: &TimerTask, first: SystemTime, period: Duration) {
        let delay = first
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);
        if let Err(err) = self.submit_repeating(task, delay, period) {
            tracing::warn!(target: "snmp_lenient::timer", { snmp.task = task.identity(), error = %err }, "failed to schedule fixed-time task");
        }
    }

    /// Service-wide cancellation. Does nothing.
    ///
    /// Tasks are cancelled individually through [`TimerTask::cancel`]; the
    /// shards keep running for the life of the service.
    pub fn cancel(&self) {
        tracing::debug!(target: "snmp_lenient::timer", "service-wide cancel ignored");
    }

    fn submit_repeating(&self, task: &TimerTask, delay: Duration, period: Duration) -> Result<()> {
        if period.is_zero() {
            return Err(Error::scheduling(
                self.shard_for(task),
                SchedulingErrorKind::NonPositivePeriod,
            ));
        }
        self.submit(task, delay, Recurrence::FixedDelay(period))
    }

    fn submit(&self, task: &TimerTask, delay: Duration, recurrence: Recurrence) -> Result<()> {
        let index = self.shard_for(task);
        if !task.claim() {
            return Err(Error::scheduling(index, SchedulingErrorKind::AlreadyScheduled));
        }
        let Some(deadline) = Instant::now().checked_add(delay) else {
            task.release();
            return Err(Error::scheduling(index, SchedulingErrorKind::DelayOutOfRange));
        };

        let submission = Submission {
            deadline,
            task: task.clone(),
            recurrence,
        };
        if let Err(err) = self.inner.shards[index].submit(submission) {
            task.release();
            return Err(err);
        }

        tracing::trace!(target: "snmp_lenient::timer", { snmp.shard = index, snmp.task = task.identity(), delay_ms = delay.as_millis() as u64 }, "task scheduled");
        Ok(())
    }
}

impl std::fmt::Debug for TimerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerService")
            .field("shards", &self.shard_count())
            .finish()
    }
}
