//! Scoped worker pools.
//!
//! A [`WorkerPool`] lends borrowed state to `W` OS threads, releases them all at once
//! and joins every one of them before returning, so the caller never observes a
//! partially completed run.

use std::sync::{Condvar, Mutex, PoisonError};

use crossbeam_utils::thread;
use tracing::debug;

use crate::error::{BenchError, Result};

pub struct WorkerPool {
    name: &'static str,
    workers: usize,
}

impl WorkerPool {
    pub const fn new(name: &'static str, workers: usize) -> Self {
        Self { name, workers }
    }

    /// Runs `work(worker_id)` on every worker and waits for all of them.
    ///
    /// Workers block on a start gate until the whole pool is spawned, which maximizes
    /// the overlap between them. Panicking workers are reported after every worker has
    /// been joined.
    pub fn run<F>(&self, work: F) -> Result<()>
    where
        F: Fn(usize) + Sync,
    {
        let gate = StartGate::default();
        debug!(pool = self.name, workers = self.workers, "spawning workers");

        let outcome = thread::scope(|s| {
            let mut handles = Vec::with_capacity(self.workers);
            for id in 0..self.workers {
                let (gate, work) = (&gate, &work);
                let spawned = s
                    .builder()
                    .name(format!("{}-{id}", self.name))
                    .spawn(move |_| {
                        gate.wait();
                        work(id)
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        // let the already spawned workers finish before bailing out
                        gate.open();
                        handles.into_iter().for_each(|h| drop(h.join()));
                        return Err(BenchError::Spawn {
                            pool: self.name,
                            source,
                        });
                    }
                }
            }
            gate.open();
            let panicked = handles
                .into_iter()
                .map(|h| h.join())
                .filter(std::result::Result::is_err)
                .count();
            Ok(panicked)
        });

        // every handle is joined above, so the scope itself can only fail if a join was skipped
        let panicked = outcome.map_err(|_| self.panicked(1))??;
        debug!(pool = self.name, panicked, "workers joined");
        match panicked {
            0 => Ok(()),
            n => Err(self.panicked(n)),
        }
    }

    fn panicked(&self, panicked: usize) -> BenchError {
        BenchError::WorkerPanicked {
            benchmark: self.name,
            workers: self.workers,
            panicked,
        }
    }
}

/// One-shot latch releasing every waiting worker at once.
#[derive(Default)]
struct StartGate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl StartGate {
    fn open(&self) {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.opened.notify_all();
    }

    fn wait(&self) {
        let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        while !*open {
            open = self
                .opened
                .wait(open)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[cfg(test)]
mod pool_test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_every_worker_runs_once() {
        let pool = WorkerPool::new("test", 8);
        let seen: Vec<AtomicUsize> = (0..8).map(|_| AtomicUsize::new(0)).collect();
        pool.run(|id| {
            seen[id].fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert!(seen.iter().all(|s| s.load(Ordering::Relaxed) == 1));
    }

    /// The pool only returns once every worker has finished
    #[test]
    fn test_join_before_return() {
        let pool = WorkerPool::new("test", 4);
        let done = AtomicUsize::new(0);
        pool.run(|_| {
            std::thread::sleep(std::time::Duration::from_millis(10));
            done.fetch_add(1, Ordering::Release);
        })
        .unwrap();
        assert_eq!(done.load(Ordering::Acquire), 4);
    }

    #[test]
    fn test_panicking_worker_is_fatal() {
        let prev = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let pool = WorkerPool::new("test", 3);
        let finished = AtomicUsize::new(0);
        let err = pool
            .run(|id| {
                if id == 1 {
                    panic!("worker down");
                }
                finished.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap_err();

        std::panic::set_hook(prev);

        assert!(matches!(
            err,
            BenchError::WorkerPanicked {
                workers: 3,
                panicked: 1,
                ..
            }
        ));
        // the healthy workers still ran to completion
        assert_eq!(finished.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_empty_pool() {
        WorkerPool::new("test", 0).run(|_| unreachable!()).unwrap();
    }
}
