//! The stable statistics-counter schema.
//!
//! This module only names the counters; [`zblock_core::stats`] is what
//! actually holds and mutates them. Keeping the names here, next to the
//! error taxonomy each counter corresponds to, is what lets both the core
//! pipelines and a host-side stats exporter agree on spelling without
//! depending on each other.

/// One entry in the fixed statistics schema: a stable name plus a one-line
/// description suitable for a host's metrics exporter.
#[derive(Debug, Clone, Copy)]
pub struct CounterSpec {
    /// Stable, exported counter name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

macro_rules! counter_schema {
    ($($const_name:ident => $name:literal, $desc:literal;)*) => {
        $(
            #[doc = $desc]
            pub const $const_name: &str = $name;
        )*

        /// All counters in the schema, in declaration order.
        pub const ALL: &[CounterSpec] = &[
            $(CounterSpec { name: $name, description: $desc },)*
        ];
    };
}

counter_schema! {
    ALLOC_FAIL => "alloc_fail", "Allocator shim returned null, cause unspecified.";
    COMPRESS_ALLOC_FAIL => "compress_alloc_fail", "Compression-side context allocation failed.";
    DECOMPRESS_ALLOC_FAIL => "decompress_alloc_fail", "Decompression-side context allocation failed.";
    COMPRESS_LEVEL_INVALID => "compress_level_invalid", "compress() called with an unrecognized level_enum.";
    DECOMPRESS_LEVEL_INVALID => "decompress_level_invalid", "decompress() read back an unrecognized level_enum.";
    DECOMPRESS_HEADER_INVALID => "decompress_header_invalid", "decompress() rejected a malformed frame header.";
    COMPRESS_FAILED => "compress_failed", "The codec reported a failure other than an undersized destination.";
    DECOMPRESS_FAILED => "decompress_failed", "The codec failed to decompress a validated frame.";
    LZ4PASS_ALLOWED => "lz4pass_allowed", "The LZ4 probe judged the block compressible.";
    LZ4PASS_REJECTED => "lz4pass_rejected", "The LZ4 probe judged the block incompressible.";
    ZSTDPASS_ALLOWED => "zstdpass_allowed", "The ZSTD fast-level probe judged the block compressible.";
    ZSTDPASS_REJECTED => "zstdpass_rejected", "The ZSTD fast-level probe judged the block incompressible.";
    PASSIGNORED => "passignored", "The early-abort heuristic did not engage for this block.";
    PASSIGNORED_SIZE => "passignored_size", "The heuristic was skipped specifically because the block was below abort_size.";
    POOL_BUFFER_COUNT => "pool_buffer_count", "Number of contexts currently held by all pools.";
    POOL_BUFFER_BYTES => "pool_buffer_bytes", "Approximate byte size of all pooled contexts.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_are_unique() {
        let mut names: Vec<&str> = ALL.iter().map(|c| c.name).collect();
        names.sort_unstable();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn schema_is_nonempty() {
        assert!(!ALL.is_empty());
    }
}
