//! Scalar sequential scan over 4-byte elements

use std::hint::black_box;

/// Read every `u32` in address order `reps` times, summing with wrapping
/// addition
#[inline(never)]
pub fn scan_scalar(words: &[u32], reps: u64) -> u32 {
    let mut sum = 0u32;

    for _ in 0..reps {
        let data = black_box(words);
        let mut local = 0u32;
        for &w in data {
            local = local.wrapping_add(w);
        }
        sum = sum.wrapping_add(local);
    }

    black_box(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::AlignedBuffer;

    fn expected_sum(n: u32) -> u32 {
        (0..n).fold(0u32, |a, w| a.wrapping_add(w))
    }

    #[test]
    fn test_single_pass_visits_every_element_once() {
        let buf = AlignedBuffer::for_sequential(4096).unwrap();
        assert_eq!(scan_scalar(buf.words(), 1), expected_sum(1024));
    }

    #[test]
    fn test_repetitions_accumulate() {
        let buf = AlignedBuffer::for_sequential(2048).unwrap();
        let one = expected_sum(512);
        assert_eq!(scan_scalar(buf.words(), 3), one.wrapping_mul(3));
    }

    #[test]
    fn test_wraps_instead_of_overflowing() {
        let mut buf = AlignedBuffer::for_sequential(64).unwrap();
        buf.fill_with(u32::MAX);
        assert_eq!(scan_scalar(buf.words(), 1), 16u32.wrapping_mul(u32::MAX));
    }

    #[test]
    fn test_zero_repetitions() {
        let buf = AlignedBuffer::for_sequential(64).unwrap();
        assert_eq!(scan_scalar(buf.words(), 0), 0);
    }
}
