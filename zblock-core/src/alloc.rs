//! Allocator shim.
//!
//! The codec's own memory is managed internally by the `zstd` crate; there
//! is no safe way to intercept its malloc/free calls without `unsafe` FFI,
//! which this crate denies outright. What this module instead governs is
//! every scratch buffer *we* allocate on a block's behalf — the LZ4 probe's
//! destination, and a pooled context's backing allocation at construction
//! time — under the same two personalities the storage layer asks for:
//!
//! - [`Personality::Compression`]: allocation is non-blocking. A failure is
//!   an ordinary outcome (`None`), reported upward as "skip compression for
//!   this block", never a panic.
//! - [`Personality::Decompression`]: allocation must not fail, because the
//!   caller is blocked on recovering already-written data. A `try_reserve`
//!   failure falls back to the ordinary infallible allocator, which aborts
//!   the process on true exhaustion rather than returning an error — the
//!   closest a safe-Rust program can get to "block until memory is
//!   available".

use crate::stats::StatsSink;
use zblock_format::stats::{ALLOC_FAIL, COMPRESS_ALLOC_FAIL, DECOMPRESS_ALLOC_FAIL};

/// Which allocation policy governs a buffer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    /// Non-blocking: a failure is reported, not fatal.
    Compression,
    /// Must not fail: a failure is masked by falling back to an infallible
    /// allocation.
    Decompression,
}

/// Allocate a zero-filled buffer of `len` bytes under the given personality,
/// bumping the matching failure counters on the non-blocking path.
pub fn alloc_buffer(personality: Personality, len: usize, stats: &StatsSink) -> Option<Vec<u8>> {
    match personality {
        Personality::Compression => {
            let mut buf = Vec::new();
            if buf.try_reserve_exact(len).is_err() {
                stats.bump(COMPRESS_ALLOC_FAIL);
                stats.bump(ALLOC_FAIL);
                return None;
            }
            buf.resize(len, 0);
            Some(buf)
        }
        Personality::Decompression => {
            let mut buf = Vec::new();
            if buf.try_reserve_exact(len).is_err() {
                stats.bump(DECOMPRESS_ALLOC_FAIL);
                stats.bump(ALLOC_FAIL);
                buf.reserve_exact(len);
            }
            buf.resize(len, 0);
            Some(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_side_allocates_normally() {
        let stats = StatsSink::new();
        let buf = alloc_buffer(Personality::Compression, 4096, &stats).unwrap();
        assert_eq!(buf.len(), 4096);
        assert_eq!(stats.get(ALLOC_FAIL), 0);
    }

    #[test]
    fn decompression_side_allocates_normally() {
        let stats = StatsSink::new();
        let buf = alloc_buffer(Personality::Decompression, 4096, &stats).unwrap();
        assert_eq!(buf.len(), 4096);
        assert_eq!(stats.get(ALLOC_FAIL), 0);
    }

    #[test]
    fn zero_length_allocation_succeeds_for_both_personalities() {
        let stats = StatsSink::new();
        assert_eq!(alloc_buffer(Personality::Compression, 0, &stats).unwrap().len(), 0);
        assert_eq!(alloc_buffer(Personality::Decompression, 0, &stats).unwrap().len(), 0);
    }
}
