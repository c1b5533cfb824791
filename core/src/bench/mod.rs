//! Benchmark measurement module
//! Scoped timing and throughput reporting for every scan run

pub mod report;
pub mod timer;

pub use report::{MemoryReporter, ReportLine, Reporter, StdoutReporter};
pub use timer::{Measurement, ScopedTimer, Throughput, UnitPrefix};
