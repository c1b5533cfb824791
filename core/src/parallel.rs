//! Multi-threaded scan fan-out
//!
//! A fresh set of named workers is spawned per run. Each reads the same
//! shared buffer, keeps its accumulator to itself and hands it back through
//! its join handle. The orchestrator merges the slots after every worker has
//! joined, so nothing is written concurrently.

use std::thread;

use tracing::debug;

use crate::affinity;
use crate::buffer::AlignedBuffer;
use crate::error::{BenchError, Result};
use crate::scan::{scan_scalar, scan_strided, scan_vector, Accumulator, Kernel};

/// Read-only description of the work every worker performs
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub buffer: &'a AlignedBuffer,
    pub kernel: Kernel,
    pub reps_per_thread: u64,
    /// Only read by the strided kernel
    pub stride_bytes: usize,
}

impl<'a> TaskContext<'a> {
    pub fn new(buffer: &'a AlignedBuffer, kernel: Kernel, reps_per_thread: u64, stride_bytes: usize) -> Self {
        Self {
            buffer,
            kernel,
            reps_per_thread,
            stride_bytes,
        }
    }

    /// Run this context's scan on the current thread
    pub fn run_worker(&self) -> Accumulator {
        let reps = self.reps_per_thread;
        match self.kernel {
            Kernel::Scalar => Accumulator::Scalar(scan_scalar(self.buffer.logical_words(), reps)),
            Kernel::Vector => Accumulator::Vector(scan_vector(self.buffer.lanes(), reps)),
            Kernel::Strided => Accumulator::Scalar(scan_strided(
                self.buffer.words(),
                self.buffer.len(),
                self.stride_bytes,
                reps,
            )),
        }
    }

    /// Bytes covered by one worker
    pub fn bytes_per_thread(&self) -> u64 {
        self.reps_per_thread * self.buffer.len() as u64
    }
}

/// Spawn `threads` workers over `ctx`, join them all, then merge their
/// results. The merge is commutative and associative, so completion order
/// does not affect the outcome.
pub fn run(ctx: &TaskContext<'_>, threads: usize) -> Result<Accumulator> {
    if threads == 0 {
        return Err(BenchError::InvalidConfig("thread count must be positive".to_string()));
    }

    debug!(
        "Spawning {} workers | {} reps each | {} bytes",
        threads,
        ctx.reps_per_thread,
        ctx.buffer.len()
    );

    let slots = thread::scope(|scope| -> Result<Vec<Accumulator>> {
        let mut handles = Vec::with_capacity(threads);

        for worker_id in 0..threads {
            let handle = thread::Builder::new()
                .name(format!("membw-worker-{}", worker_id))
                .spawn_scoped(scope, move || {
                    affinity::release_current();
                    ctx.run_worker()
                })
                .map_err(|e| BenchError::Worker(format!("spawn worker {}: {}", worker_id, e)))?;
            handles.push(handle);
        }

        handles
            .into_iter()
            .enumerate()
            .map(|(worker_id, handle)| {
                handle
                    .join()
                    .map_err(|_| BenchError::Worker(format!("worker {} panicked", worker_id)))
            })
            .collect()
    })?;

    Ok(slots
        .into_iter()
        .fold(Accumulator::zero(ctx.kernel), Accumulator::merge))
}
