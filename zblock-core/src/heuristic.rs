//! Early-abort compressibility heuristic.
//!
//! Running the real codec at a high level against incompressible data is
//! pure waste: the output is always rejected once it comes back larger than
//! the source, but the caller still paid for the expensive search. Before
//! committing to the requested level, a cheap LZ4 probe (and optionally a
//! second, fast-level ZSTD probe) checks whether the block looks
//! compressible at all, against a budget tightened below the real
//! destination size. [`crate::pipeline`] owns the orchestration — this
//! module only decides eligibility and runs the LZ4 half of the probe; the
//! ZSTD half is just a recursive call into the pipeline's own `compress` at
//! a fast level, so it lives there instead of being duplicated here.

use zblock_format::constants::{DEFAULT_ABORT_SIZE, DEFAULT_CUTOFF_LEVEL, DEFAULT_LZ4_SHIFT};

use crate::alloc::{alloc_buffer, Personality};
use crate::stats::StatsSink;

/// Tunable parameters governing when and how the heuristic engages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicConfig {
    /// Whether the LZ4 probe runs at all.
    pub lz4_pass: bool,
    /// Whether a rejected LZ4 probe is followed by a second, ZSTD fast-level
    /// probe before giving up.
    pub zstd_pass: bool,
    /// Fast `level_enum` used for the secondary ZSTD probe.
    pub probe_level: i32,
    /// The heuristic only engages for requests at or above this level;
    /// below it, running the real codec is already cheap enough that a
    /// probe would only add overhead.
    pub cutoff_level: i32,
    /// The heuristic only engages for blocks at or above this size.
    pub abort_size: usize,
    /// Shift applied to `s_len` to tighten the probe's destination budget:
    /// `budget = s_len - (s_len >> lz4_shift)`.
    pub lz4_shift: u32,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            lz4_pass: true,
            zstd_pass: false,
            probe_level: -1,
            cutoff_level: DEFAULT_CUTOFF_LEVEL,
            abort_size: DEFAULT_ABORT_SIZE,
            lz4_shift: DEFAULT_LZ4_SHIFT,
        }
    }
}

/// Whether the heuristic should engage at all for this request.
///
/// The heuristic is skipped (and the real codec always runs) below the
/// configured level or size cutoffs, and whenever the LZ4 pass itself is
/// disabled.
pub fn engages(config: &HeuristicConfig, level_enum: i32, s_len: usize) -> bool {
    config.lz4_pass && level_enum >= config.cutoff_level && s_len >= config.abort_size
}

/// The tightened destination budget the probe must fit within.
pub fn probe_budget(s_len: usize, lz4_shift: u32) -> usize {
    s_len - (s_len >> lz4_shift)
}

/// Run the LZ4 half of the probe: does `src` compress to no more than
/// `budget` bytes?
///
/// A probe failure (including "would not fit") reads as `false`; the probe
/// never panics on incompressible input, since that is exactly the case it
/// exists to detect cheaply. The probe's scratch destination goes through
/// the same non-blocking allocator shim compression uses elsewhere, so a
/// probe under memory pressure fails closed rather than stalling the block.
pub fn lz4_probe_fits(src: &[u8], budget: usize, stats: &StatsSink) -> bool {
    if budget == 0 {
        return false;
    }
    let Some(mut dst) = alloc_buffer(Personality::Compression, budget, stats) else {
        return false;
    };
    lz4_flex::block::compress_into(src, &mut dst).is_ok()
}
