//! A single timer thread and its run queue.
//!
//! Submissions travel over a channel; the heap itself is owned by the shard
//! thread and never shared.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::task::TimerTask;
use crate::error::{Error, Result, SchedulingErrorKind};

/// How a submitted task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recurrence {
    Once,
    /// Re-armed `period` after each run starts.
    FixedDelay(Duration),
}

/// A submission on its way to a shard.
pub(crate) struct Submission {
    pub(crate) deadline: Instant,
    pub(crate) task: TimerTask,
    pub(crate) recurrence: Recurrence,
}

/// Heap entry. Earliest deadline first, then submission order.
struct Queued {
    deadline: Instant,
    seq: u64,
    task: TimerTask,
    recurrence: Recurrence,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the earliest entry.
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Handle to a running shard thread.
pub(crate) struct Shard {
    index: usize,
    name: String,
    tx: Sender<Submission>,
}

impl Shard {
    /// Start the shard thread. The thread is detached and does not keep the
    /// process alive.
    pub(crate) fn spawn(index: usize, name: String) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(index, rx))
            .map_err(|source| Error::ThreadSpawn {
                name: name.clone().into_boxed_str(),
                source,
            })?;
        tracing::debug!(target: "snmp_lenient::timer", { snmp.shard = index, thread = %name }, "timer shard started");
        Ok(Self { index, name, tx })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Hand a submission to the shard thread.
    pub(crate) fn submit(&self, submission: Submission) -> Result<()> {
        self.tx
            .send(submission)
            .map_err(|_| Error::scheduling(self.index, SchedulingErrorKind::ShardStopped))
    }
}

/// Shard thread body.
///
/// Runs until every sender is gone and the queue has drained. Repeating
/// tasks are not re-armed once the senders are gone.
fn run(index: usize, rx: Receiver<Submission>) {
    let mut queue: BinaryHeap<Queued> = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut connected = true;

    loop {
        let now = Instant::now();
        while queue.peek().is_some_and(|top| top.deadline <= now) {
            if let Some(entry) = queue.pop() {
                if let Some(next) = fire(index, entry, connected) {
                    seq += 1;
                    queue.push(Queued { seq, ..next });
                }
            }
        }

        let next_deadline = queue.peek().map(|top| top.deadline);
        let received = match (connected, next_deadline) {
            (false, None) => break,
            (false, Some(deadline)) => {
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                continue;
            }
            (true, None) => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            (true, Some(deadline)) => {
                rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
        };

        match received {
            Ok(submission) => {
                seq += 1;
                queue.push(Queued {
                    deadline: submission.deadline,
                    seq,
                    task: submission.task,
                    recurrence: submission.recurrence,
                });
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!(target: "snmp_lenient::timer", { snmp.shard = index, pending = queue.len() }, "timer service dropped, draining shard");
                connected = false;
            }
        }
    }

    tracing::debug!(target: "snmp_lenient::timer", { snmp.shard = index }, "timer shard stopped");
}

/// Run a due entry. Returns the entry to re-queue for repeating tasks.
fn fire(index: usize, entry: Queued, rearm: bool) -> Option<Queued> {
    let task = &entry.task;
    match entry.recurrence {
        Recurrence::Once => {
            if !task.begin_final_run() {
                return None;
            }
            run_guarded(index, task);
            None
        }
        Recurrence::FixedDelay(period) => {
            if !task.is_scheduled() {
                return None;
            }
            let started = Instant::now();
            run_guarded(index, task);
            if !rearm || !task.is_scheduled() {
                return None;
            }
            let deadline = started.checked_add(period)?;
            Some(Queued { deadline, ..entry })
        }
    }
}

/// Run a task, keeping the shard alive if it panics.
fn run_guarded(index: usize, task: &TimerTask) {
    if panic::catch_unwind(AssertUnwindSafe(|| task.run())).is_err() {
        tracing::error!(target: "snmp_lenient::timer", { snmp.shard = index, snmp.task = task.identity() }, "timer task panicked");
    }
}
