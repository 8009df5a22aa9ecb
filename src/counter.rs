//! Unsynchronized shared counter.
//!
//! Every worker performs a plain read-modify-write on one shared integer. The read and
//! the write are two separate operations, so concurrent increments interleave and
//! overwrite each other. **The lost updates are the measurement**: wrapping the
//! increment in a lock or turning it into a single `fetch_add` removes the race and
//! makes this benchmark pointless.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{info, warn};

use crate::{
    clock::measure,
    error::Result,
    pool::WorkerPool,
    result::{Metric, RunResult},
};

/// Integer shared by every worker with no exclusivity.
///
/// Backed by an atomic cell only so that each individual load and store is well
/// defined; the increment as a whole is deliberately not atomic.
#[derive(Default)]
pub struct RacyCounter(AtomicUsize);

impl RacyCounter {
    pub const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    /// Load, add one, store. Another worker's increment landing between the load and
    /// the store is silently overwritten.
    #[inline]
    pub fn increment(&self) {
        let current = self.0.load(Ordering::Relaxed);
        self.0.store(current + 1, Ordering::Relaxed);
    }

    /// Reads the value. Only meaningful once every writer has been joined, which
    /// supplies the happens-before edge the relaxed stores lack.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct UnsynchronizedCounterBenchmark {
    workers: usize,
    increments: usize,
}

impl UnsynchronizedCounterBenchmark {
    pub const LABEL: &'static str = "unsynchronized counter";

    pub const fn new(workers: usize, increments: usize) -> Self {
        Self {
            workers,
            increments,
        }
    }

    /// Value the counter would reach if no update were lost.
    pub const fn expected(&self) -> usize {
        self.workers * self.increments
    }

    /// Increments `counter` from every worker and returns its final value.
    ///
    /// The counter is owned by the caller and lent to the workers for the duration of
    /// the run; no value is read before every worker has completed.
    pub fn run_on(&self, counter: &RacyCounter) -> Result<usize> {
        WorkerPool::new("counter", self.workers).run(|_| {
            for _ in 0..self.increments {
                counter.increment();
            }
        })?;
        Ok(counter.get())
    }

    pub fn run(&self) -> Result<RunResult> {
        info!(
            workers = self.workers,
            increments = self.increments,
            "{} started",
            Self::LABEL
        );
        let counter = RacyCounter::new();
        let (ops, elapsed) = measure(|| self.run_on(&counter));
        let ops = ops?;
        let lost = self.expected().saturating_sub(ops);
        if lost > 0 {
            warn!(lost, expected = self.expected(), "counter lost updates");
        }
        info!(ops, ?elapsed, "{} finished", Self::LABEL);

        Ok(RunResult::new(Self::LABEL, elapsed)
            .with("ops", Metric::Count(ops))
            .with("expected", Metric::Count(self.expected()))
            .with("lost", Metric::Count(lost)))
    }
}
