//! zblock - host-facing adapter: process lifecycle, tunables, and
//! statistics export over the pooled ZSTD compress/decompress pipeline.
//!
//! Most callers only need [`global`] to reach the process-wide [`Adapter`]
//! instance and its [`Adapter::compress`]/[`Adapter::decompress`] pair; the
//! lower-level pool and heuristic machinery lives in `zblock-core` and is
//! re-exported here only for callers building their own adapter instance
//! (tests, benches, the bundled CLI demo) rather than sharing the global
//! one.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;

use std::sync::OnceLock;

pub use config::Tunables;
pub use zblock_core::{CompressionContext, DecompressionContext, HeuristicConfig};
pub use zblock_format::{FrameError, Result};

use zblock_core::{compress_with_heuristic, decompress, CoreState};

/// A self-contained compression adapter: pooled codec contexts, live
/// tunables, and the statistics they accumulate.
///
/// Constructing more than one `Adapter` is legitimate (tests commonly do to
/// keep counters isolated); [`global`] exists only because most hosts want
/// exactly one, process-wide.
pub struct Adapter {
    core: CoreState,
    tunables: Tunables,
}

impl Adapter {
    /// Build an adapter with empty pools and default tunables.
    pub fn new() -> Self {
        Self {
            core: CoreState::new(),
            tunables: Tunables::new(),
        }
    }

    /// Compress `src` into `dst` at `level_enum`.
    ///
    /// The early-abort heuristic engages according to the adapter's current
    /// [`Tunables`]; `Ok(src.len())` means compression was declined (store
    /// `src` uncompressed), not an error.
    pub fn compress(&self, src: &[u8], dst: &mut [u8], level_enum: i32) -> Result<usize> {
        let config = self.tunables.snapshot();
        compress_with_heuristic(&self.core, src, dst, level_enum, &config)
    }

    /// Decompress a frame previously written by [`Adapter::compress`],
    /// returning the `level_enum` it was compressed at.
    pub fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<i32> {
        decompress(&self.core, src, dst)
    }

    /// The adapter's live, runtime-writable tunables.
    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// A point-in-time snapshot of every exported statistic, in schema
    /// order.
    pub fn stats(&self) -> Vec<(&'static str, u64)> {
        self.core.refresh_pool_stats();
        self.core.stats().snapshot()
    }

    /// Reap idle pooled contexts immediately rather than waiting for the
    /// next eligible `compress`/`decompress` call. Meant for a host's own
    /// periodic maintenance tick, not the hot path.
    pub fn reap_now(&self) {
        self.core.reap();
    }

    /// Tear down pooled contexts. Callers must ensure no `compress` or
    /// `decompress` call is in flight on this adapter.
    pub fn fini(&self) {
        self.core.destroy();
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<Adapter> = OnceLock::new();

/// Lazily build and return the process-wide [`Adapter`].
///
/// The first caller pays for constructing the (still-empty) pools; every
/// later caller, on any thread, shares the same instance.
pub fn global() -> &'static Adapter {
    GLOBAL.get_or_init(Adapter::new)
}

/// Tear down the process-wide adapter's pooled contexts.
///
/// A later call to [`global`] returns the same, now-empty instance rather
/// than a fresh one — `OnceLock` has no mechanism to reset itself — so this
/// is meant for quiescent shutdown, not for cycling the adapter mid-process.
pub fn fini() {
    if let Some(adapter) = GLOBAL.get() {
        adapter.fini();
    }
}
