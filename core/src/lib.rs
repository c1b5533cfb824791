//! membw Core
//!
//! Memory-read throughput benchmark across working-set sizes.
//!
//! ## Architecture
//! - Bench: scoped timer and throughput reporting
//! - Buffer: aligned, pre-filled read buffers
//! - Scan: scalar, 256-bit vector and cache-line strided kernels
//! - Parallel: per-run worker fan-out with merge after join
//! - Runner: sweeps over buffer sizes and patterns

pub mod affinity;
pub mod bench;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod error;
pub mod parallel;
pub mod runner;
pub mod scan;

pub use bench::{Measurement, MemoryReporter, Reporter, ScopedTimer, StdoutReporter};
pub use buffer::{AlignedBuffer, Lane};
pub use config::{BenchConfig, LoggingConfig};
pub use error::{BenchError, Result};
pub use runner::{RunPlan, Runner};
pub use scan::{Accumulator, ScanPattern};
