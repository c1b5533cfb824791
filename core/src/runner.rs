//! Sweep orchestration
//! One section per pattern, one measured run per buffer size

use tracing::{debug, info};

use crate::affinity;
use crate::bench::{Reporter, ScopedTimer};
use crate::buffer::AlignedBuffer;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::parallel::{self, TaskContext};
use crate::scan::{self, Accumulator, Kernel, ScanPattern, STRIDED_PADDING_BYTES};

/// Shape of one measured run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub size_bytes: usize,
    pub reps_per_thread: u64,
    pub threads: usize,
}

impl RunPlan {
    /// Bytes the run reads in total, used as the timer count
    pub fn total_bytes(&self) -> u64 {
        self.reps_per_thread * self.threads as u64 * self.size_bytes as u64
    }
}

pub struct Runner<'r> {
    config: BenchConfig,
    reporter: &'r dyn Reporter,
}

impl<'r> Runner<'r> {
    pub fn new(config: BenchConfig, reporter: &'r dyn Reporter) -> Self {
        Self { config, reporter }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run every configured sweep and return the grand total of all
    /// accumulators
    pub fn run_all(&self) -> Result<u64> {
        let mut total = 0u64;
        for &pattern in &self.config.patterns {
            total = total.wrapping_add(self.run_sweep(pattern)?);
        }
        Ok(total)
    }

    /// Print the section header and measure every configured size
    pub fn run_sweep(&self, pattern: ScanPattern) -> Result<u64> {
        self.reporter.section(pattern.header());

        if pattern.is_threaded() {
            affinity::release_current();
        } else if let Some(core) = self.config.pin_core {
            affinity::pin_current(core);
        }

        if matches!(pattern.kernel(), Kernel::Vector) && !scan::avx2_available() {
            info!("AVX2 not detected, vector sweep uses the portable kernel");
        }

        let mut total = 0u64;
        for &size_kb in &self.config.sizes_kb {
            total = total.wrapping_add(self.run_size(pattern, size_kb)?.total());
        }
        Ok(total)
    }

    pub fn plan(&self, pattern: ScanPattern, size_kb: u64) -> RunPlan {
        let size_bytes = size_kb * 1024;

        if pattern.is_threaded() {
            RunPlan {
                size_bytes: size_bytes as usize,
                reps_per_thread: scan::per_thread_repetitions(
                    self.config.multi_thread_budget_bytes,
                    size_bytes,
                    self.config.threads,
                ),
                threads: self.config.threads,
            }
        } else {
            RunPlan {
                size_bytes: size_bytes as usize,
                reps_per_thread: scan::repetitions(self.config.single_thread_budget_bytes, size_bytes),
                threads: 1,
            }
        }
    }

    /// Allocate, scan and report one buffer size. Allocation and filling are
    /// excluded from the measurement; the buffer is freed after the timer
    /// has reported.
    pub fn run_size(&self, pattern: ScanPattern, size_kb: u64) -> Result<Accumulator> {
        let plan = self.plan(pattern, size_kb);
        let kernel = pattern.kernel();

        debug!(
            "{:?} | {}KB | {} reps x {} threads",
            pattern, size_kb, plan.reps_per_thread, plan.threads
        );

        let mut timer = ScopedTimer::new(
            format!("Size: {}KB; speed:", size_kb),
            plan.total_bytes(),
            self.reporter,
        );

        let buffer = match kernel {
            Kernel::Strided => AlignedBuffer::for_strided(plan.size_bytes, STRIDED_PADDING_BYTES)?,
            Kernel::Scalar | Kernel::Vector => AlignedBuffer::for_sequential(plan.size_bytes)?,
        };
        timer.exclude_elapsed();

        let ctx = TaskContext::new(&buffer, kernel, plan.reps_per_thread, self.config.cache_line_bytes);

        let acc = if pattern.is_threaded() {
            parallel::run(&ctx, plan.threads)?
        } else {
            ctx.run_worker()
        };

        drop(timer);
        Ok(acc)
    }
}
