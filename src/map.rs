//! Mutex-guarded shared map.
//!
//! Workers insert disjoint keys into one `HashMap` behind a single mutex. The lock is
//! taken and released around every insert rather than around a worker's whole loop:
//! the workers keep competing for it, which is the contention being timed.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use tracing::info;

use crate::{
    clock::measure,
    error::Result,
    pool::WorkerPool,
    result::{Metric, RunResult},
};

pub type SharedMap = Mutex<HashMap<u64, u64>>;

pub struct LockGuardedMapBenchmark {
    workers: usize,
    inserts: usize,
}

impl LockGuardedMapBenchmark {
    pub const LABEL: &'static str = "lock-guarded map";

    pub const fn new(workers: usize, inserts: usize) -> Self {
        Self { workers, inserts }
    }

    pub const fn expected(&self) -> usize {
        self.workers * self.inserts
    }

    /// Key written by `worker` at step `i`. Workers own disjoint key ranges.
    #[inline]
    pub const fn key(&self, worker: usize, i: usize) -> u64 {
        (worker * self.inserts + i) as u64
    }

    /// Fills `map` from every worker and returns once all of them are done.
    pub fn run_on(&self, map: &SharedMap) -> Result<()> {
        WorkerPool::new("map", self.workers).run(|worker| {
            for i in 0..self.inserts {
                let key = self.key(worker, i);
                // a poisoned lock means a sibling panicked; the pool reports that
                map.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key, i as u64);
            }
        })
    }

    /// Keys expected after a run but absent from `map`.
    pub fn missing_keys(&self, map: &HashMap<u64, u64>) -> Vec<u64> {
        (0..self.workers)
            .flat_map(|w| (0..self.inserts).map(move |i| (w, i)))
            .map(|(w, i)| self.key(w, i))
            .filter(|k| !map.contains_key(k))
            .collect()
    }

    pub fn run(&self) -> Result<RunResult> {
        info!(
            workers = self.workers,
            inserts = self.inserts,
            "{} started",
            Self::LABEL
        );
        let map = SharedMap::default();
        let (outcome, elapsed) = measure(|| self.run_on(&map));
        outcome?;
        let len = map.into_inner().unwrap_or_else(PoisonError::into_inner).len();
        info!(len, ?elapsed, "{} finished", Self::LABEL);

        Ok(RunResult::new(Self::LABEL, elapsed)
            .with("len", Metric::Count(len))
            .with("expected", Metric::Count(self.expected())))
    }
}
