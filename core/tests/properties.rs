//! Property tests for budgets, unit tiers and scan coverage

use membw_core::bench::UnitPrefix;
use membw_core::buffer::AlignedBuffer;
use membw_core::parallel::{self, TaskContext};
use membw_core::scan::{self, Accumulator, Kernel};
use membw_core::Measurement;
use proptest::prelude::*;

proptest! {
    #[test]
    fn single_thread_budget_within_one_buffer(size_kb in 1u64..=(1 << 20), budget_gib in 1u64..=8) {
        let budget = budget_gib << 30;
        let size = size_kb * 1024;
        let reps = scan::repetitions(budget, size);
        let covered = reps * size;
        prop_assert!(covered <= budget);
        prop_assert!(budget - covered < size);
    }

    #[test]
    fn per_thread_budget_within_one_buffer(size_kb in 1u64..=(1 << 16), threads in 1usize..=64) {
        let aggregate = 64u64 << 30;
        let size = size_kb * 1024;
        let reps = scan::per_thread_repetitions(aggregate, size, threads);
        let total = reps * threads as u64 * size;
        prop_assert!(total <= aggregate);
        prop_assert!(aggregate - total < size * (threads as u64 + 1));
    }

    #[test]
    fn prefix_tiers(count in any::<u64>()) {
        let expected = if count > 1_000_000_000 {
            UnitPrefix::Giga
        } else if count > 1_000_000 {
            UnitPrefix::Mega
        } else if count > 1_000 {
            UnitPrefix::Kilo
        } else {
            UnitPrefix::None
        };
        prop_assert_eq!(UnitPrefix::for_count(count), expected);
    }

    #[test]
    fn throughput_is_finite_when_timed(bytes in 1u64..u64::MAX / 2, millis in 1u64..1_000_000) {
        let m = Measurement { label: "p".to_string(), bytes, millis };
        let t = m.throughput().unwrap();
        prop_assert!(t.value.is_finite());
        prop_assert!(t.value > 0.0);
    }

    #[test]
    fn threaded_scalar_matches_single(lanes in 1usize..64, threads in 1usize..8, reps in 1u64..4) {
        let buf = AlignedBuffer::for_sequential(lanes * 32).unwrap();
        let ctx = TaskContext::new(&buf, Kernel::Scalar, reps, 64);
        let merged = parallel::run(&ctx, threads).unwrap();
        let single = scan::scan_scalar(buf.logical_words(), reps * threads as u64);
        prop_assert_eq!(merged, Accumulator::Scalar(single));
    }

    #[test]
    fn strided_visits_ceil_of_span(span_words in 1usize..4096, stride_words in 1usize..64) {
        let span = span_words * 4;
        let stride = stride_words * 4;
        let mut buf = AlignedBuffer::for_strided(span, scan::STRIDED_PADDING_BYTES).unwrap();
        buf.fill_with(1);
        let visits = scan::visits_per_pass(span, stride);
        prop_assert_eq!(visits, (span + stride - 1) / stride);
        prop_assert_eq!(scan::scan_strided(buf.words(), span, stride, 1) as usize, visits);
    }
}

#[test]
fn boundary_counts_pick_lower_tier() {
    assert_eq!(UnitPrefix::for_count(1_000), UnitPrefix::None);
    assert_eq!(UnitPrefix::for_count(1_000_000), UnitPrefix::Kilo);
    assert_eq!(UnitPrefix::for_count(1_000_000_000), UnitPrefix::Mega);
}
