//! Rendezvous handoff latency
//!
//! Two parties bounce a token over a [`RendezvousChannel`]. Every send parks until the
//! peer receives, so each round trip forces two full suspend/resume handoffs:
//!
//! 1. B sends, waiting for A to receive
//! 2. A receives and sends back, waiting for B to receive
//! 3. B receives, closing the round trip
//!
//! The same protocol runs under each [`SchedulingMode`]. Pinned isolates the task switch
//! itself; parallel adds cross-thread wakeups (and whatever true parallel progress buys).

mod channel;
mod mode;
mod probe;

pub use channel::{Disconnected, Endpoint, RendezvousChannel};
pub use mode::SchedulingMode;
pub use probe::{HandoffTrace, NoProbe, Party, Probe};

use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    clock::measure_async,
    error::{BenchError, Result},
    result::{Metric, RunResult},
};

/// Carries nothing: only the transfer of control matters.
type Token = ();

pub struct RendezvousLatencyBenchmark {
    round_trips: usize,
    mode: SchedulingMode,
}

impl RendezvousLatencyBenchmark {
    pub const fn new(round_trips: usize, mode: SchedulingMode) -> Self {
        Self { round_trips, mode }
    }

    pub fn label(&self) -> String {
        format!("rendezvous ({})", self.mode)
    }

    pub fn run(&self) -> Result<RunResult> {
        self.run_with(Arc::new(NoProbe))
    }

    /// Runs the ping-pong with `probe` observing every token movement.
    pub fn run_with<P: Probe>(&self, probe: Arc<P>) -> Result<RunResult> {
        info!(
            round_trips = self.round_trips,
            contexts = self.mode.max_parallelism(),
            "rendezvous {} started",
            self.mode.name()
        );
        let runtime = self.mode.runtime()?;
        let elapsed = runtime.block_on(self.ping_pong(probe))?;
        let average = average_handoff(elapsed, self.round_trips);
        info!(?elapsed, ?average, "rendezvous {} finished", self.mode.name());

        Ok(RunResult::new(self.label(), elapsed)
            .with("round trips", Metric::Count(self.round_trips))
            .with("handoffs", Metric::Count(2 * self.round_trips))
            .with("average handoff", Metric::Duration(average)))
    }

    /// Spawns both parties as tasks and times them until both are done.
    async fn ping_pong<P: Probe>(&self, probe: Arc<P>) -> Result<Duration> {
        let (a, b) = RendezvousChannel::<Token>::default().split();
        let round_trips = self.round_trips;

        let ((a_done, b_done), elapsed) = measure_async(async {
            let responder = tokio::spawn(respond(a, round_trips, probe.clone()));
            let initiator = tokio::spawn(initiate(b, round_trips, probe));
            (responder.await, initiator.await)
        })
        .await;

        // a panicking task is the root cause of its peer's disconnect
        let (a_done, b_done) = (a_done?, b_done?);
        let completed = a_done?.min(b_done?);
        debug_assert_eq!(completed, round_trips);
        Ok(elapsed)
    }
}

/// Party A: receive, then answer. Returns the round trips it took part in.
async fn respond<P: Probe>(
    a: Endpoint<Token>,
    round_trips: usize,
    probe: Arc<P>,
) -> Result<usize> {
    let disconnected = |completed| BenchError::Disconnected {
        completed,
        expected: round_trips,
    };
    for i in 0..round_trips {
        let token = a.recv().await.map_err(|_| disconnected(i))?;
        probe.acquired(Party::A);
        probe.released(Party::A);
        a.send(token).await.map_err(|_| disconnected(i))?;
    }
    Ok(round_trips)
}

/// Party B: send, then wait for the answer. Returns the round trips it completed.
async fn initiate<P: Probe>(
    b: Endpoint<Token>,
    round_trips: usize,
    probe: Arc<P>,
) -> Result<usize> {
    let disconnected = |completed| BenchError::Disconnected {
        completed,
        expected: round_trips,
    };
    for i in 0..round_trips {
        probe.released(Party::B);
        b.send(()).await.map_err(|_| disconnected(i))?;
        b.recv().await.map_err(|_| disconnected(i))?;
        probe.acquired(Party::B);
    }
    Ok(round_trips)
}

/// Mean time of one handoff: `elapsed / (2 * round_trips)`, truncated to whole nanoseconds.
pub fn average_handoff(elapsed: Duration, round_trips: usize) -> Duration {
    let handoffs = 2 * round_trips as u128;
    if handoffs == 0 {
        return Duration::ZERO;
    }
    let nanos = elapsed.as_nanos() / handoffs;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
