//! Process-wide monotonic clock
//! Anchored once on first use, never adjusted afterwards

use std::sync::OnceLock;
use std::time::Instant;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Nanoseconds elapsed since the process anchor
#[inline(always)]
pub fn now_ns() -> u64 {
    let anchor = ANCHOR.get_or_init(Instant::now);
    anchor.elapsed().as_nanos() as u64
}

/// Truncating nanosecond to millisecond conversion
#[inline]
pub fn ns_to_ms(ns: u64) -> u64 {
    ns / 1_000_000
}
