//! Error taxonomy for the frame format and level map.

use thiserror::Error;

/// Errors that can arise while framing, parsing, or level-mapping a block.
///
/// This mirrors the taxonomy the compression and decompression pipelines
/// report against: every variant here is bumped to exactly one statistics
/// counter by its caller, never zero and never more than one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// `level_enum` is not in the recognized domain (1..=19 or a known fast tag).
    #[error("compression level enum {0} is not recognized")]
    LevelInvalid(i32),
    /// The frame header failed validation (`c_len + header size > s_len`, or
    /// a `level_enum` outside the recognized domain was read back off the wire).
    #[error("frame header is invalid: {0}")]
    HeaderInvalid(&'static str),
    /// The codec version does not fit in the header's 24-bit field.
    #[error("codec version {0} overflows the 24-bit header field")]
    VersionOverflow(u32),
    /// The allocator shim could not satisfy a request (compression side only).
    #[error("context allocation failed")]
    AllocFailed,
    /// The codec reported a failure other than an undersized destination.
    #[error("codec call failed: {0}")]
    CodecFailed(String),
    /// The codec declined to save space, or the destination was too small;
    /// an expected outcome, not a fault.
    #[error("compression would not save space")]
    WouldNotSave,
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FrameError>;
