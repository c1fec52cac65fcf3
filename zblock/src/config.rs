//! Runtime-writable tunables.
//!
//! Every knob here can be changed by a host while the adapter is serving
//! concurrent `compress`/`decompress` calls; each field is therefore its own
//! atomic rather than something guarded by a single lock, so a reader never
//! blocks behind a writer touching an unrelated knob.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicUsize, Ordering};

use zblock_core::HeuristicConfig;
use zblock_format::constants::{DEFAULT_ABORT_SIZE, DEFAULT_CUTOFF_LEVEL, DEFAULT_LZ4_SHIFT};

/// Live, atomically-updatable configuration backing the early-abort
/// heuristic.
///
/// `ea_division_mode`, `ea_divisor`, and `ea_level_factor` are accepted and
/// stored for host compatibility but are not read by [`Tunables::snapshot`]:
/// this port's heuristic always uses the fixed `s_len - (s_len >> shift)`
/// budget rather than switching between multiple division strategies.
pub struct Tunables {
    lz4_pass: AtomicBool,
    zstd_pass: AtomicBool,
    probe_level: AtomicI32,
    cutoff_level: AtomicI32,
    abort_size: AtomicUsize,
    lz4_shift: AtomicU32,
    ea_division_mode: AtomicU32,
    ea_divisor: AtomicU32,
    ea_level_factor: AtomicI32,
}

impl Tunables {
    /// Build tunables initialized to the published defaults.
    pub fn new() -> Self {
        let defaults = HeuristicConfig::default();
        Self {
            lz4_pass: AtomicBool::new(defaults.lz4_pass),
            zstd_pass: AtomicBool::new(defaults.zstd_pass),
            probe_level: AtomicI32::new(defaults.probe_level),
            cutoff_level: AtomicI32::new(DEFAULT_CUTOFF_LEVEL),
            abort_size: AtomicUsize::new(DEFAULT_ABORT_SIZE),
            lz4_shift: AtomicU32::new(DEFAULT_LZ4_SHIFT),
            ea_division_mode: AtomicU32::new(0),
            ea_divisor: AtomicU32::new(0),
            ea_level_factor: AtomicI32::new(0),
        }
    }

    /// A point-in-time [`HeuristicConfig`] snapshot for a single
    /// `compress_with_heuristic` call.
    pub fn snapshot(&self) -> HeuristicConfig {
        HeuristicConfig {
            lz4_pass: self.lz4_pass.load(Ordering::Relaxed),
            zstd_pass: self.zstd_pass.load(Ordering::Relaxed),
            probe_level: self.probe_level.load(Ordering::Relaxed),
            cutoff_level: self.cutoff_level.load(Ordering::Relaxed),
            abort_size: self.abort_size.load(Ordering::Relaxed),
            lz4_shift: self.lz4_shift.load(Ordering::Relaxed),
        }
    }

    /// Enable or disable the LZ4 probe.
    pub fn set_lz4_pass(&self, enabled: bool) {
        self.lz4_pass.store(enabled, Ordering::Relaxed);
    }

    /// Enable or disable the secondary ZSTD fast-level probe.
    pub fn set_zstd_pass(&self, enabled: bool) {
        self.zstd_pass.store(enabled, Ordering::Relaxed);
    }

    /// Set the fast `level_enum` used for the secondary probe.
    pub fn set_probe_level(&self, level_enum: i32) {
        self.probe_level.store(level_enum, Ordering::Relaxed);
    }

    /// Set the minimum request level at which the heuristic engages.
    pub fn set_cutoff_level(&self, level: i32) {
        self.cutoff_level.store(level, Ordering::Relaxed);
    }

    /// Set the minimum block size at which the heuristic engages.
    pub fn set_abort_size(&self, size: usize) {
        self.abort_size.store(size, Ordering::Relaxed);
    }

    /// Set the shift used to tighten the LZ4 probe's destination budget.
    pub fn set_lz4_shift(&self, shift: u32) {
        self.lz4_shift.store(shift, Ordering::Relaxed);
    }

    /// Accepted for host compatibility; not consulted by the heuristic.
    pub fn set_ea_division_mode(&self, mode: u32) {
        self.ea_division_mode.store(mode, Ordering::Relaxed);
    }

    /// Accepted for host compatibility; not consulted by the heuristic.
    pub fn set_ea_divisor(&self, divisor: u32) {
        self.ea_divisor.store(divisor, Ordering::Relaxed);
    }

    /// Accepted for host compatibility; not consulted by the heuristic.
    pub fn set_ea_level_factor(&self, factor: i32) {
        self.ea_level_factor.store(factor, Ordering::Relaxed);
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self::new()
    }
}
