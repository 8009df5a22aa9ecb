//! syncbench - concurrency and I/O micro-benchmarks
//!
//! Runs every stage with the fixed parameters from `config` and prints one block of
//! `<label>: <value>` lines per stage. Diagnostics go to stderr.

use anyhow::{Context, Result};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use syncbench::{BenchmarkRunner, config::SuiteConfig};

fn setup_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &SuiteConfig) {
    println!("syncbench v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!(
        "Workers: {}, Ops per worker: {}",
        config.workers, config.ops_per_worker
    );
    println!(
        "Round trips: {}, CPUs: {}",
        config.round_trips,
        num_cpus::get()
    );
    println!("File lines: {}", config.file_lines);
    println!("====================================\n");
}

fn run() -> Result<()> {
    let runner = BenchmarkRunner::default();
    print_banner(runner.config());

    let results = runner.run().context("benchmark run aborted")?;
    info!(stages = results.len(), "all stages completed");
    Ok(())
}

fn main() {
    setup_logging();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}
