//! Completion tracking for one batch of runs

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

/// One-shot batch verdict: `true` when no screenshot failed.
///
/// Firing consumes the handle, so a batch can notify at most once.
#[derive(Debug)]
pub struct Completion(oneshot::Sender<bool>);

impl Completion {
    pub fn channel() -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn fire(self, all_passed: bool) {
        // A dropped receiver just means nobody is listening.
        let _ = self.0.send(all_passed);
    }
}

/// Countdown of outstanding runs and the running failure total
#[derive(Debug)]
pub struct ExecutionBatch {
    total: usize,
    remaining: AtomicUsize,
    failures: AtomicUsize,
}

impl ExecutionBatch {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            remaining: AtomicUsize::new(total),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Acquire)
    }

    /// An empty batch is complete from the start
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Record one finished run with `failures` failed screenshots.
    ///
    /// Returns the verdict only to the call that takes `remaining` to zero.
    /// Calls after that are ignored and `remaining` never underflows.
    pub fn record(&self, failures: usize) -> Option<bool> {
        // Failures land before the decrement so the last run sees every one.
        self.failures.fetch_add(failures, Ordering::AcqRel);

        let decremented = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match decremented {
            Ok(previous) => (previous == 1).then(|| self.failures() == 0),
            Err(_) => {
                self.failures.fetch_sub(failures, Ordering::AcqRel);
                None
            }
        }
    }
}
