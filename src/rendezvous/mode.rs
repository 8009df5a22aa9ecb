use std::fmt;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::{BenchError, Result};

/// How many execution contexts may host the two parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingMode {
    /// Both parties share a single OS thread: every handoff is a pure task switch.
    Pinned,
    /// Parties may run on up to `contexts` OS threads at once.
    Parallel { contexts: usize },
}

impl SchedulingMode {
    /// Parallel mode as wide as the host's logical CPUs.
    pub fn parallel() -> Self {
        Self::Parallel {
            contexts: num_cpus::get(),
        }
    }

    pub const fn max_parallelism(self) -> usize {
        match self {
            Self::Pinned => 1,
            Self::Parallel { contexts } => {
                if contexts == 0 {
                    1
                } else {
                    contexts
                }
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pinned => "pinned",
            Self::Parallel { .. } => "parallel",
        }
    }

    /// Builds a runtime private to one benchmark run; no process-wide scheduler
    /// setting is touched.
    pub(crate) fn runtime(self) -> Result<Runtime> {
        let runtime = match self {
            Self::Pinned => Builder::new_current_thread().build(),
            Self::Parallel { .. } => Builder::new_multi_thread()
                .worker_threads(self.max_parallelism())
                .thread_name("rendezvous")
                .build(),
        };
        debug!(mode = self.name(), contexts = self.max_parallelism(), "runtime built");
        runtime.map_err(|source| BenchError::Runtime {
            mode: self.name(),
            source,
        })
    }
}

impl fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pinned => write!(f, "pinned, 1 context"),
            Self::Parallel { .. } => write!(f, "parallel, {} contexts", self.max_parallelism()),
        }
    }
}

#[cfg(test)]
mod mode_test {
    use super::*;

    #[test]
    fn test_parallelism() {
        assert_eq!(SchedulingMode::Pinned.max_parallelism(), 1);
        assert_eq!(SchedulingMode::Parallel { contexts: 6 }.max_parallelism(), 6);
        assert_eq!(SchedulingMode::Parallel { contexts: 0 }.max_parallelism(), 1);
        assert!(SchedulingMode::parallel().max_parallelism() >= 1);
    }

    /// Pinned mode keeps every task on the thread driving the runtime
    #[test]
    fn test_pinned_runtime_single_thread() {
        let runtime = SchedulingMode::Pinned.runtime().unwrap();
        let driver = std::thread::current().id();
        let seen = runtime.block_on(async {
            let task = tokio::spawn(async { std::thread::current().id() });
            task.await.unwrap()
        });
        assert_eq!(seen, driver);
    }

    #[test]
    fn test_parallel_runtime_width() {
        let runtime = SchedulingMode::Parallel { contexts: 3 }.runtime().unwrap();
        assert_eq!(runtime.metrics().num_workers(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(SchedulingMode::Pinned.to_string(), "pinned, 1 context");
        assert_eq!(
            SchedulingMode::Parallel { contexts: 4 }.to_string(),
            "parallel, 4 contexts"
        );
    }
}
