//! Concurrency and I/O micro-benchmarks
//!
//! A closed suite of benchmarks that each isolate one trade-off:
//!
//! - [`counter`]: many workers incrementing a shared integer without
//!   synchronization, exposing lost updates
//! - [`map`]: many workers inserting into a mutex-guarded map, exposing
//!   contention while staying race-free
//! - [`rendezvous`]: two parties ping-ponging a token over a zero-capacity
//!   channel, on one execution context and on many
//! - [`file_write`]: unbuffered vs buffered file output
//!
//! [`runner::BenchmarkRunner`] sequences them and renders one
//! [`result::RunResult`] per stage.

pub mod clock;
pub mod config;
pub mod counter;
pub mod error;
pub mod file_write;
pub mod map;
pub mod pool;
pub mod rendezvous;
pub mod result;
pub mod runner;

pub use error::{BenchError, Result};
pub use result::RunResult;
pub use runner::BenchmarkRunner;
