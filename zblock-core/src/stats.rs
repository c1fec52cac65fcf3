//! Atomics-backed statistics sink.
//!
//! [`zblock_format::stats`] names the fixed set of counters; this module is
//! what actually stores and mutates them. One `AtomicU64` per counter, built
//! once from the schema and never resized afterward, so bumping a counter
//! never takes a lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use zblock_format::stats::{CounterSpec, ALL};

/// A fixed-schema, thread-safe counter bank.
///
/// Every counter named in [`zblock_format::stats::ALL`] exists from
/// construction; [`StatsSink::bump`] and [`StatsSink::add`] on an unknown
/// name are a no-op rather than a panic, so a caller that passes a stale
/// name from a mismatched build never takes the process down over a metric.
pub struct StatsSink {
    counters: HashMap<&'static str, AtomicU64>,
}

impl StatsSink {
    /// Build a sink with every schema counter initialized to zero.
    pub fn new() -> Self {
        let counters = ALL
            .iter()
            .map(|spec: &CounterSpec| (spec.name, AtomicU64::new(0)))
            .collect();
        Self { counters }
    }

    /// Increment a named counter by one.
    pub fn bump(&self, name: &'static str) {
        self.add(name, 1);
    }

    /// Add `delta` to a named counter.
    pub fn add(&self, name: &'static str, delta: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(delta, Ordering::Relaxed);
        }
    }

    /// Overwrite a named counter, for gauges like `pool_buffer_count` that
    /// track a point-in-time value rather than a running total.
    pub fn set(&self, name: &'static str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.store(value, Ordering::Relaxed);
        }
    }

    /// Read a single counter's current value.
    pub fn get(&self, name: &'static str) -> u64 {
        self.counters
            .get(name)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// A full point-in-time snapshot of every counter, in schema order.
    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        ALL.iter().map(|spec| (spec.name, self.get(spec.name))).collect()
    }
}

impl Default for StatsSink {
    fn default() -> Self {
        Self::new()
    }
}
