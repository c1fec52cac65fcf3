//! The pooled codec context types.
//!
//! Both contexts wrap a `zstd` bulk-mode object configured once at
//! construction for magicless frames with the checksum and content-size
//! fields both turned off — this crate's own 8-byte header already carries
//! everything a reader needs, so the bytes ZSTD's own frame format would
//! spend on the same information are pure overhead.

use std::io;

use zstd::zstd_safe::{CParameter, DParameter, FrameFormat};

/// A pooled compression context. Reused across calls; [`reset`] reapplies
/// the baseline frame parameters in case a previous checkout (a bug,
/// ordinarily) left them disturbed.
///
/// [`reset`]: CompressionContext::reset
pub struct CompressionContext {
    compressor: zstd::bulk::Compressor<'static>,
}

impl CompressionContext {
    /// Construct a context at a baseline level; the real per-call level is
    /// set with [`CompressionContext::set_level`] before each use.
    pub fn new() -> io::Result<Self> {
        let mut compressor = zstd::bulk::Compressor::new(1)?;
        compressor.set_parameter(CParameter::Format(FrameFormat::Magicless))?;
        compressor.set_parameter(CParameter::ChecksumFlag(false))?;
        compressor.set_parameter(CParameter::ContentSizeFlag(false))?;
        Ok(Self { compressor })
    }

    /// Reapply the baseline frame parameters. Cheap: these are just
    /// advisory session parameters, not a reallocation.
    pub fn reset(&mut self) {
        let _ = self.compressor.set_parameter(CParameter::Format(FrameFormat::Magicless));
        let _ = self.compressor.set_parameter(CParameter::ChecksumFlag(false));
        let _ = self.compressor.set_parameter(CParameter::ContentSizeFlag(false));
    }

    /// Set the codec level used by the next [`compress_into`] call.
    ///
    /// [`compress_into`]: CompressionContext::compress_into
    pub fn set_level(&mut self, codec_level: i32) -> io::Result<()> {
        self.compressor.set_parameter(CParameter::CompressionLevel(codec_level))
    }

    /// Compress `src` into `dst`, returning the number of bytes written.
    ///
    /// Fails (rather than panicking) when `dst` is too small to hold the
    /// compressed output; the caller treats that exactly like "compression
    /// would not save space".
    pub fn compress_into(&mut self, src: &[u8], dst: &mut [u8]) -> io::Result<usize> {
        self.compressor.compress_to_buffer(src, dst)
    }
}

/// A pooled decompression context.
pub struct DecompressionContext {
    decompressor: zstd::bulk::Decompressor<'static>,
}

impl DecompressionContext {
    /// Construct a context with the matching magicless frame parameter.
    pub fn new() -> io::Result<Self> {
        let mut decompressor = zstd::bulk::Decompressor::new()?;
        decompressor.set_parameter(DParameter::Format(FrameFormat::Magicless))?;
        Ok(Self { decompressor })
    }

    /// Reapply the baseline frame parameter.
    pub fn reset(&mut self) {
        let _ = self.decompressor.set_parameter(DParameter::Format(FrameFormat::Magicless));
    }

    /// Decompress `src` into `dst`, returning the number of bytes written.
    pub fn decompress_into(&mut self, src: &[u8], dst: &mut [u8]) -> io::Result<usize> {
        self.decompressor.decompress_to_buffer(src, dst)
    }
}
