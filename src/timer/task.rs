//! Timer task handles.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of identities for tasks created without an explicit one.
static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of a [`TimerTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Created, never submitted.
    Virgin,
    /// Submitted and waiting to fire (repeating tasks stay here between runs).
    Scheduled,
    /// One-shot task that has fired.
    Executed,
    /// Cancelled through its handle.
    Cancelled,
}

impl TaskState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Virgin,
            1 => Self::Scheduled,
            2 => Self::Executed,
            _ => Self::Cancelled,
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            Self::Virgin => 0,
            Self::Scheduled => 1,
            Self::Executed => 2,
            Self::Cancelled => 3,
        }
    }
}

type Action = Box<dyn FnMut() + Send>;

struct Inner {
    identity: u64,
    state: AtomicU8,
    runs: AtomicU64,
    action: Mutex<Action>,
}

/// A unit of work for the [`TimerService`](super::TimerService).
///
/// Cloning yields another handle to the same task. The identity decides the
/// shard the task runs on; tasks sharing an identity share a shard.
///
/// A task can be submitted once. Its state moves to
/// [`Scheduled`](TaskState::Scheduled) inside the scheduling call, so the
/// caller can inspect it straight afterwards.
///
/// ```
/// use snmp_lenient::timer::{TaskState, TimerTask};
///
/// let task = TimerTask::with_identity(42, || {});
/// assert_eq!(task.identity(), 42);
/// assert_eq!(task.state(), TaskState::Virgin);
/// ```
#[derive(Clone)]
pub struct TimerTask {
    inner: Arc<Inner>,
}

impl TimerTask {
    /// Create a task with a fresh identity.
    pub fn new(action: impl FnMut() + Send + 'static) -> Self {
        let identity = NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed);
        Self::with_identity(identity, action)
    }

    /// Create a task with a caller-chosen identity (a request ID, for instance).
    pub fn with_identity(identity: u64, action: impl FnMut() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                identity,
                state: AtomicU8::new(TaskState::Virgin.as_u8()),
                runs: AtomicU64::new(0),
                action: Mutex::new(Box::new(action)),
            }),
        }
    }

    /// The task's identity.
    pub fn identity(&self) -> u64 {
        self.inner.identity
    }

    /// 32-bit hash of the identity, folding the high half into the low half.
    pub fn identity_hash(&self) -> i32 {
        let id = self.inner.identity;
        (id ^ (id >> 32)) as i32
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    /// Number of times the action has been invoked.
    pub fn run_count(&self) -> u64 {
        self.inner.runs.load(Ordering::Acquire)
    }

    /// Cancel the task.
    ///
    /// Returns `true` if this prevented at least one future run, that is the
    /// task was scheduled. The state becomes [`Cancelled`](TaskState::Cancelled)
    /// regardless, except for one-shot tasks that already fired.
    pub fn cancel(&self) -> bool {
        let mut current = self.inner.state.load(Ordering::Acquire);
        loop {
            let state = TaskState::from_u8(current);
            if state == TaskState::Executed || state == TaskState::Cancelled {
                return false;
            }
            match self.inner.state.compare_exchange(
                current,
                TaskState::Cancelled.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return state == TaskState::Scheduled,
                Err(actual) => current = actual,
            }
        }
    }

    /// Move `Virgin -> Scheduled`. Fails if the task was ever submitted or cancelled.
    pub(crate) fn claim(&self) -> bool {
        self.transition(TaskState::Virgin, TaskState::Scheduled)
    }

    /// Undo a claim whose submission did not reach a shard.
    pub(crate) fn release(&self) {
        self.transition(TaskState::Scheduled, TaskState::Virgin);
    }

    /// Move `Scheduled -> Executed` ahead of a one-shot run.
    pub(crate) fn begin_final_run(&self) -> bool {
        self.transition(TaskState::Scheduled, TaskState::Executed)
    }

    pub(crate) fn is_scheduled(&self) -> bool {
        self.state() == TaskState::Scheduled
    }

    /// Invoke the action on the calling thread.
    ///
    /// A poisoned lock (an earlier run panicked) is recovered; the shard
    /// decides how to report the panic.
    pub(crate) fn run(&self) {
        self.inner.runs.fetch_add(1, Ordering::AcqRel);
        let mut guard = self
            .inner
            .action
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let action: &mut Action = &mut guard;
        action();
    }

    fn transition(&self, from: TaskState, to: TaskState) -> bool {
        self.inner
            .state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl fmt::Debug for TimerTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerTask")
            .field("identity", &self.identity())
            .field("state", &self.state())
            .field("runs", &self.run_count())
            .finish()
    }
}
