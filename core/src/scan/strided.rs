//! Cache-line strided scan
//!
//! Reads one `u32` per stride so each pass touches one element per line.
//! Repetition `r` starts `r mod 1024` elements in, so successive passes land
//! on different words of the padded buffer. This is a rough latency measurement,
//! not a rigorous one.

use std::hint::black_box;

/// Number of distinct start offsets before the rotation repeats
pub const OFFSET_ROTATION: u64 = 1024;

/// Over-allocation that keeps the largest start offset inside the buffer
pub const STRIDED_PADDING_BYTES: usize = OFFSET_ROTATION as usize * std::mem::size_of::<u32>();

/// Start element for repetition `rep`
#[inline(always)]
pub fn start_offset(rep: u64) -> usize {
    (rep % OFFSET_ROTATION) as usize
}

/// Elements read per pass over `span_bytes`
pub fn visits_per_pass(span_bytes: usize, stride_bytes: usize) -> usize {
    if stride_bytes == 0 {
        return 0;
    }
    span_bytes.div_ceil(stride_bytes)
}

/// One pass: `visits` reads starting at `start`, `stride_elems` apart
#[inline(always)]
pub fn strided_pass(words: &[u32], start: usize, stride_elems: usize, visits: usize) -> u32 {
    words[start..]
        .iter()
        .step_by(stride_elems)
        .take(visits)
        .fold(0u32, |acc, &w| acc.wrapping_add(w))
}

/// `reps` passes over the first `span_bytes` of `words`. `words` must extend
/// at least `STRIDED_PADDING_BYTES` past the span.
#[inline(never)]
pub fn scan_strided(words: &[u32], span_bytes: usize, stride_bytes: usize, reps: u64) -> u32 {
    debug_assert!(words.len() * 4 >= span_bytes + STRIDED_PADDING_BYTES);
    debug_assert!(stride_bytes >= 4 && stride_bytes % 4 == 0);

    let stride_elems = stride_bytes / 4;
    let visits = visits_per_pass(span_bytes, stride_bytes);
    let mut sum = 0u32;

    for rep in 0..reps {
        let data = black_box(words);
        sum = sum.wrapping_add(strided_pass(data, start_offset(rep), stride_elems, visits));
    }

    black_box(sum)
}
