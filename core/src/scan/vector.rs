//! 256-bit vector sequential scan
//!
//! XOR is used to combine lanes: it costs one cycle everywhere, so the
//! arithmetic never shows up in the timing.

use std::hint::black_box;

use crate::buffer::Lane;

/// True when the AVX2 kernel will be used
pub fn avx2_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// XOR every 32-byte lane `reps` times. Dispatches to AVX2 when the CPU has
/// it; the portable path produces the same bits.
pub fn scan_vector(lanes: &[Lane], reps: u64) -> Lane {
    #[cfg(target_arch = "x86_64")]
    {
        if avx2_available() {
            // SAFETY: AVX2 presence checked above
            return unsafe { scan_vector_avx2(lanes, reps) };
        }
    }
    scan_vector_portable(lanes, reps)
}

#[inline(never)]
pub fn scan_vector_portable(lanes: &[Lane], reps: u64) -> Lane {
    let mut sum = Lane::ZERO;

    for _ in 0..reps {
        let data = black_box(lanes);
        let mut local = Lane::ZERO;
        for &lane in data {
            local = local.xor(lane);
        }
        sum = sum.xor(local);
    }

    black_box(sum)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[inline(never)]
unsafe fn scan_vector_avx2(lanes: &[Lane], reps: u64) -> Lane {
    use std::arch::x86_64::*;

    let mut sum = _mm256_setzero_si256();

    for _ in 0..reps {
        let data = black_box(lanes);
        let mut local = _mm256_setzero_si256();
        for lane in data {
            // `Lane` is 32-byte aligned, as the aligned load requires
            let v = _mm256_load_si256(lane as *const Lane as *const __m256i);
            local = _mm256_xor_si256(local, v);
        }
        sum = _mm256_xor_si256(sum, local);
    }

    let mut out = Lane::ZERO;
    _mm256_store_si256(&mut out as *mut Lane as *mut __m256i, sum);
    black_box(out)
}
