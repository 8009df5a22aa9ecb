//! Stage sequencing.
//!
//! Stages share nothing: each one builds its own state, runs to completion and hands
//! back a [`RunResult`]. The first fatal error stops the run.

use std::io::{self, Write};

use tracing::info;

use crate::{
    config::SuiteConfig,
    counter::UnsynchronizedCounterBenchmark,
    error::{BenchError, Result},
    file_write::{FileWriteBenchmark, buffering_gain},
    map::LockGuardedMapBenchmark,
    rendezvous::{RendezvousLatencyBenchmark, SchedulingMode},
    result::RunResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Counter,
    Map,
    RendezvousPinned,
    RendezvousParallel,
    FileWrite,
}

impl Stage {
    /// Default order of a full run.
    pub const ALL: [Stage; 5] = [
        Stage::Counter,
        Stage::Map,
        Stage::RendezvousPinned,
        Stage::RendezvousParallel,
        Stage::FileWrite,
    ];
}

#[derive(Default)]
pub struct BenchmarkRunner {
    config: SuiteConfig,
}

impl BenchmarkRunner {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn run_stage(&self, stage: Stage) -> Result<RunResult> {
        let config = &self.config;
        match stage {
            Stage::Counter => {
                UnsynchronizedCounterBenchmark::new(config.workers, config.ops_per_worker).run()
            }
            Stage::Map => LockGuardedMapBenchmark::new(config.workers, config.ops_per_worker).run(),
            Stage::RendezvousPinned => {
                RendezvousLatencyBenchmark::new(config.round_trips, SchedulingMode::Pinned).run()
            }
            Stage::RendezvousParallel => {
                RendezvousLatencyBenchmark::new(config.round_trips, SchedulingMode::parallel())
                    .run()
            }
            Stage::FileWrite => {
                let bench = FileWriteBenchmark::new(&config.scratch_dir, config.file_lines);
                let outcome = bench.run();
                // leave no scratch files behind, even after a failed write
                let cleaned = bench.cleanup();
                let result = outcome?;
                cleaned?;
                info!(gain = ?buffering_gain(&result), "buffering");
                Ok(result)
            }
        }
    }

    /// Runs `stages` in order, writing each result to `out` as soon as it is known.
    pub fn run_stages<W: Write>(&self, stages: &[Stage], out: &mut W) -> Result<Vec<RunResult>> {
        let mut results = Vec::with_capacity(stages.len());
        for &stage in stages {
            let result = self.run_stage(stage)?;
            writeln!(out, "{result}\n").map_err(BenchError::io("<stdout>"))?;
            results.push(result);
        }
        Ok(results)
    }

    /// Runs every stage, rendering to stdout.
    pub fn run(&self) -> Result<Vec<RunResult>> {
        let stdout = io::stdout();
        self.run_stages(&Stage::ALL, &mut stdout.lock())
    }
}
