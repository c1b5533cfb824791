//! Memory scan patterns
//!
//! Every kernel folds each loaded element into a loop-local accumulator, folds
//! that into a persistent one once per repetition, and passes the slice and the
//! final value through `black_box` so no pass can be removed or merged.

pub mod scalar;
pub mod strided;
pub mod vector;

use serde::{Deserialize, Serialize};

use crate::buffer::Lane;

pub use scalar::scan_scalar;
pub use strided::{scan_strided, start_offset, strided_pass, visits_per_pass, STRIDED_PADDING_BYTES};
pub use vector::{avx2_available, scan_vector, scan_vector_portable};

/// Access pattern for one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPattern {
    Scalar,
    Vector,
    Strided,
    ScalarThreaded,
    VectorThreaded,
}

impl ScanPattern {
    pub const ALL: [ScanPattern; 5] = [
        ScanPattern::Scalar,
        ScanPattern::Vector,
        ScanPattern::Strided,
        ScanPattern::ScalarThreaded,
        ScanPattern::VectorThreaded,
    ];

    /// Header printed before the sweep
    pub fn header(self) -> &'static str {
        match self {
            ScanPattern::Scalar => "Normal benchmark:",
            ScanPattern::Vector => "AVX2 benchmark:",
            ScanPattern::Strided => "Cache-line benchmark:",
            ScanPattern::ScalarThreaded => "Normal multithreaded benchmark:",
            ScanPattern::VectorThreaded => "AVX2 multithreaded benchmark:",
        }
    }

    pub fn is_threaded(self) -> bool {
        matches!(self, ScanPattern::ScalarThreaded | ScanPattern::VectorThreaded)
    }

    /// Kernel each worker runs
    pub fn kernel(self) -> Kernel {
        match self {
            ScanPattern::Scalar | ScanPattern::ScalarThreaded => Kernel::Scalar,
            ScanPattern::Vector | ScanPattern::VectorThreaded => Kernel::Vector,
            ScanPattern::Strided => Kernel::Strided,
        }
    }
}

/// Inner loop variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Scalar,
    Vector,
    Strided,
}

/// Opaque result of a scan. Only its existence matters; it is surfaced so the
/// optimizer cannot treat the loads as dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulator {
    Scalar(u32),
    Vector(Lane),
}

impl Accumulator {
    pub fn zero(kernel: Kernel) -> Self {
        match kernel {
            Kernel::Scalar | Kernel::Strided => Accumulator::Scalar(0),
            Kernel::Vector => Accumulator::Vector(Lane::ZERO),
        }
    }

    /// Commutative, associative combine: wrapping add for scalars, XOR for lanes
    pub fn merge(self, other: Accumulator) -> Accumulator {
        match (self, other) {
            (Accumulator::Scalar(a), Accumulator::Scalar(b)) => Accumulator::Scalar(a.wrapping_add(b)),
            (Accumulator::Vector(a), Accumulator::Vector(b)) => Accumulator::Vector(a.xor(b)),
            (a, b) => unreachable!("accumulators of one run share a kernel: {:?} vs {:?}", a, b),
        }
    }

    /// Value folded into the grand total
    pub fn total(self) -> u64 {
        match self {
            Accumulator::Scalar(v) => v as u64,
            Accumulator::Vector(lane) => lane.fold(),
        }
    }
}

/// Repetitions so that `reps * size_bytes` approximates `budget_bytes`
pub fn repetitions(budget_bytes: u64, size_bytes: u64) -> u64 {
    if size_bytes == 0 {
        return 0;
    }
    (budget_bytes / size_bytes).max(1)
}

/// Per-worker repetitions when `aggregate_budget_bytes` is shared evenly
/// across `threads`
pub fn per_thread_repetitions(aggregate_budget_bytes: u64, size_bytes: u64, threads: usize) -> u64 {
    if size_bytes == 0 || threads == 0 {
        return 0;
    }
    ((aggregate_budget_bytes / size_bytes) / threads as u64).max(1)
}
