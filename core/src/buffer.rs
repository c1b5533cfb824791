//! Aligned read buffers
//!
//! One [`AlignedBuffer`] is owned by exactly one run. It is written once right
//! after allocation and only read afterwards, so it can be shared across
//! worker threads without synchronization.

use std::alloc::Layout;
use std::slice;

use aligned_vec::{avec_rt, AVec, RuntimeAlign};

use crate::error::{BenchError, Result};

/// Alignment needed for 256-bit aligned loads
pub const LANE_ALIGN: usize = 32;

/// Alignment of the strided scan buffer
pub const PAGE_ALIGN: usize = 4096;

/// One 256-bit vector lane
#[repr(C, align(32))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lane(pub [u64; 4]);

impl Lane {
    pub const ZERO: Lane = Lane([0; 4]);

    #[inline(always)]
    pub fn xor(self, other: Lane) -> Lane {
        Lane([
            self.0[0] ^ other.0[0],
            self.0[1] ^ other.0[1],
            self.0[2] ^ other.0[2],
            self.0[3] ^ other.0[3],
        ])
    }

    /// Collapse the four words into one value for the grand total
    pub fn fold(self) -> u64 {
        self.0[0] ^ self.0[1] ^ self.0[2] ^ self.0[3]
    }
}

/// Heap block with a fixed alignment, backed by an aligned vector of words
pub struct AlignedBuffer {
    data: AVec<u32, RuntimeAlign>,
    len: usize,
}

impl AlignedBuffer {
    /// Allocate `len + padding` bytes aligned to `align`, filled with the
    /// sequential `u32` pattern `0, 1, 2, ...`.
    pub fn new(len: usize, padding: usize, align: usize) -> Result<Self> {
        if align < std::mem::align_of::<u32>() {
            return Err(BenchError::InvalidConfig(format!(
                "alignment {} is below u32 alignment",
                align
            )));
        }

        let total = len
            .checked_add(padding)
            .ok_or(BenchError::Allocation { size: usize::MAX, align })?;
        if total == 0 || total % std::mem::size_of::<u32>() != 0 {
            return Err(BenchError::InvalidConfig(format!(
                "buffer size {} must be a non-zero multiple of 4",
                total
            )));
        }

        // Rejects non power-of-two alignments and sizes past isize::MAX
        // before the vector gets a chance to panic on them
        Layout::from_size_align(total, align)?;

        let data = avec_rt![[align] | 0u32; total / std::mem::size_of::<u32>()];
        let mut buffer = Self { data, len };
        buffer.fill_sequential();
        Ok(buffer)
    }

    /// Buffer laid out for vector and scalar sequential scans
    pub fn for_sequential(len: usize) -> Result<Self> {
        Self::new(len, 0, LANE_ALIGN)
    }

    /// Over-allocated, page-aligned buffer for the strided scan
    pub fn for_strided(len: usize, padding: usize) -> Result<Self> {
        Self::new(len, padding, PAGE_ALIGN)
    }

    /// Logical length in bytes, excluding padding
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated length in bytes, including padding
    pub fn capacity(&self) -> usize {
        self.data.len() * std::mem::size_of::<u32>()
    }

    pub fn align(&self) -> usize {
        self.data.alignment()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr() as *const u8
    }

    /// Every element including padding
    pub fn words(&self) -> &[u32] {
        &self.data
    }

    /// Elements of the logical region only
    pub fn logical_words(&self) -> &[u32] {
        &self.data[..self.len / 4]
    }

    /// Logical region as 256-bit lanes. Trailing bytes that do not fill a
    /// whole lane are not included.
    pub fn lanes(&self) -> &[Lane] {
        assert!(self.align() >= LANE_ALIGN, "buffer is not lane aligned");
        let count = self.len / std::mem::size_of::<Lane>();
        // SAFETY: the vector is initialized, aligned to at least
        // `LANE_ALIGN` and holds `count * 8` words; `Lane` is plain `u64`s
        unsafe { slice::from_raw_parts(self.data.as_ptr() as *const Lane, count) }
    }

    /// Rewrite with `0, 1, 2, ...` across the whole allocation
    pub fn fill_sequential(&mut self) {
        for (i, w) in self.data.iter_mut().enumerate() {
            *w = i as u32;
        }
    }

    pub fn fill_with(&mut self, value: u32) {
        self.data.fill(value);
    }
}

impl std::fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("align", &self.align())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_and_fill() {
        let buf = AlignedBuffer::for_sequential(2048).unwrap();
        assert_eq!(buf.as_ptr() as usize % LANE_ALIGN, 0);
        assert_eq!(buf.len(), 2048);
        assert_eq!(buf.words().len(), 512);
        assert!(buf.words().iter().enumerate().all(|(i, &w)| w == i as u32));
        assert_eq!(buf.lanes().len(), 64);
    }

    #[test]
    fn test_strided_buffer_is_padded() {
        let buf = AlignedBuffer::for_strided(8192, 4096).unwrap();
        assert_eq!(buf.as_ptr() as usize % PAGE_ALIGN, 0);
        assert_eq!(buf.len(), 8192);
        assert_eq!(buf.capacity(), 8192 + 4096);
        assert_eq!(buf.words().len(), (8192 + 4096) / 4);
    }

    #[test]
    fn test_lane_view_matches_words() {
        let buf = AlignedBuffer::for_sequential(64).unwrap();
        let lanes = buf.lanes();
        // little-endian packing of two u32 words per u64
        let first = lanes[0].0[0];
        if cfg!(target_endian = "little") {
            assert_eq!(first, 1u64 << 32);
        }
        assert_eq!(lanes.len(), 2);
    }

    #[test]
    fn test_fill_with_constant() {
        let mut buf = AlignedBuffer::for_sequential(256).unwrap();
        buf.fill_with(7);
        assert!(buf.words().iter().all(|&w| w == 7));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(matches!(
            AlignedBuffer::new(0, 0, LANE_ALIGN),
            Err(BenchError::InvalidConfig(_))
        ));
        assert!(matches!(
            AlignedBuffer::new(6, 0, LANE_ALIGN),
            Err(BenchError::InvalidConfig(_))
        ));
        assert!(matches!(AlignedBuffer::new(64, 0, 3), Err(BenchError::InvalidConfig(_))));
        assert!(matches!(AlignedBuffer::new(64, 0, 48), Err(BenchError::Layout(_))));
    }

    #[test]
    fn test_overflowing_size_is_an_error() {
        assert!(matches!(
            AlignedBuffer::new(usize::MAX, 4, LANE_ALIGN),
            Err(BenchError::Allocation { .. })
        ));
        // multiple of 4 but past isize::MAX
        let huge = (isize::MAX as usize & !3) + 4;
        assert!(matches!(AlignedBuffer::new(huge, 0, LANE_ALIGN), Err(BenchError::Layout(_))));
    }

    #[test]
    fn test_buffer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AlignedBuffer>();

        let buf = AlignedBuffer::for_sequential(4096).unwrap();
        let sums: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| buf.logical_words().iter().map(|&w| w as u64).sum::<u64>()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(sums.iter().all(|&s| s == (0..1024u64).sum::<u64>()));
    }

    #[test]
    fn test_lane_xor_and_fold() {
        let a = Lane([1, 2, 4, 8]);
        let b = Lane([1, 0, 0, 0]);
        assert_eq!(a.xor(b), Lane([0, 2, 4, 8]));
        assert_eq!(a.xor(a), Lane::ZERO);
        assert_eq!(a.fold(), 15);
    }
}
