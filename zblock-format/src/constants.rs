//! Constants shared by the frame codec and level map.

/// Size in bytes of the on-disk frame header: two 32-bit big-endian words.
pub const HEADER_SIZE: usize = 8;

/// Number of bits reserved for the codec version inside the packed word.
pub const VERSION_BITS: u32 = 24;

/// Largest codec version that fits in the header's 24-bit field.
pub const VERSION_MAX: u32 = (1 << VERSION_BITS) - 1;

/// Codec version written by this implementation.
///
/// Read but never interpreted on decode (see [`crate::header::decode_header`]);
/// bumping it is safe for future on-disk format changes because old frames
/// still carry their own `level_enum`, not a translated codec level.
pub const CURRENT_CODEC_VERSION: u32 = 1;

/// Default idle interval after which [`crate`] pools may be reaped, in seconds.
pub const POOL_REAP_INTERVAL_SECS: u64 = 15;

/// Default minimum level at or above which the early-abort heuristic engages.
pub const DEFAULT_CUTOFF_LEVEL: i32 = 3;

/// Default minimum block size (bytes) for the early-abort heuristic to engage.
pub const DEFAULT_ABORT_SIZE: usize = 131_072;

/// Default right-shift applied to `s_len` to compute the LZ4 probe budget.
pub const DEFAULT_LZ4_SHIFT: u32 = 3;
