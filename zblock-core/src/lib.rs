//! zblock-core - context pooling, the allocator shim, the early-abort
//! heuristic, and frame compress/decompress orchestration.
//!
//! This crate has no knowledge of process lifecycle or tunable
//! configuration; the top-level `zblock` crate owns the single long-lived
//! [`pipeline::CoreState`] and decides when tunables change.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alloc;
pub mod context;
pub mod heuristic;
pub mod pipeline;
pub mod pool;
pub mod stats;

pub use context::{CompressionContext, DecompressionContext};
pub use heuristic::HeuristicConfig;
pub use pipeline::{compress, compress_with_heuristic, decompress, CoreState};
pub use pool::Pool;
pub use stats::StatsSink;
