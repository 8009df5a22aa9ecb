//! Fatal conditions of a benchmark run

use std::{io, path::PathBuf};
use thiserror::Error;

/// Every variant aborts the run: a timing computed over a partial run is meaningless.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("{panicked} of {workers} workers panicked in {benchmark}")]
    WorkerPanicked {
        benchmark: &'static str,
        workers: usize,
        panicked: usize,
    },

    #[error("failed to spawn a worker for {pool}: {source}")]
    Spawn {
        pool: &'static str,
        source: io::Error,
    },

    #[error("failed to build {mode} runtime: {source}")]
    Runtime {
        mode: &'static str,
        source: io::Error,
    },

    #[error("rendezvous peer disconnected after {completed} of {expected} round trips")]
    Disconnected { completed: usize, expected: usize },

    #[error("rendezvous partner task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl BenchError {
    /// Error mapper for `map_err`. The path is only converted once an error occurs, so
    /// it stays free inside timed write loops.
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
