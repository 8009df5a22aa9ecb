//! Fixed benchmark parameters.
//!
//! The suite takes no flags and reads no environment: every knob is a constant.
//! [`SuiteConfig`] exists so tests can run the same stages at small sizes.

use std::path::PathBuf;

/// Concurrent workers spawned by the counter and map benchmarks.
pub const WORKERS: usize = 50;
/// Increments (counter) or inserts (map) performed by each worker.
pub const OPS_PER_WORKER: usize = 1_000;
/// Round trips in the rendezvous benchmark.
pub const ROUND_TRIPS: usize = 1_000_000;
/// Lines written by each half of the file-write benchmark.
pub const FILE_LINES: usize = 100_000;
/// Content of every written line.
pub const FILE_LINE: &[u8] = b"hello world\n";

#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub workers: usize,
    pub ops_per_worker: usize,
    pub round_trips: usize,
    pub file_lines: usize,
    /// Directory receiving the file-write benchmark output.
    pub scratch_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            workers: WORKERS,
            ops_per_worker: OPS_PER_WORKER,
            round_trips: ROUND_TRIPS,
            file_lines: FILE_LINES,
            scratch_dir: std::env::temp_dir().join(format!("syncbench-{}", std::process::id())),
        }
    }
}

impl SuiteConfig {
    /// Expected counter value / map size when no update is lost.
    pub const fn total_ops(&self) -> usize {
        self.workers * self.ops_per_worker
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SuiteConfig::default();
        assert_eq!(config.workers, 50);
        assert_eq!(config.ops_per_worker, 1_000);
        assert_eq!(config.round_trips, 1_000_000);
        assert_eq!(config.total_ops(), 50_000);
        assert!(config.scratch_dir.starts_with(std::env::temp_dir()));
    }
}
