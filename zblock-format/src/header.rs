//! Frame header encode/decode.
//!
//! A compressed block is `{ 8-byte header }{ compressed payload }`. The
//! header packs two 32-bit big-endian words:
//!
//! ```text
//! word 0: c_len               (compressed payload length, bytes)
//! word 1: (version << 8) | level_ordinal
//! ```
//!
//! `level_ordinal` is a compact single-byte encoding of the *original*
//! storage-layer `level_enum` (see [`crate::level`]), not the translated
//! codec level, so a future change to the level table cannot strand data
//! already on disk. The ordinal, not the enum's raw bit pattern, is what
//! goes on the wire: a handful of the fast tags (`-500`, `-1000`) do not
//! fit in a two's-complement byte, so [`encode_header`]/[`decode_header`]
//! round-trip through [`crate::level::to_wire_ordinal`] and
//! [`crate::level::from_wire_ordinal`] instead.

use crate::constants::{HEADER_SIZE, VERSION_MAX};
use crate::error::FrameError;
use crate::level;

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Length of the compressed payload in bytes (excludes the header).
    pub c_len: u32,
    /// Opaque codec version the frame was written with.
    pub version: u32,
    /// Original storage-layer compression level enum.
    pub level_enum: i32,
}

/// Write an 8-byte frame header to the front of `dst`.
///
/// `dst` must be at least [`HEADER_SIZE`] bytes long; the caller is expected
/// to have reserved the header before the compressed payload it writes next.
///
/// # Errors
///
/// Returns [`FrameError::VersionOverflow`] if `version` does not fit in the
/// header's 24-bit field.
pub fn encode_header(dst: &mut [u8], c_len: u32, version: u32, level_enum: i32) -> Result<(), FrameError> {
    debug_assert!(dst.len() >= HEADER_SIZE);
    if version > VERSION_MAX {
        return Err(FrameError::VersionOverflow(version));
    }
    let ordinal = level::to_wire_ordinal(level_enum)?;
    let raw_version_level = (version << 8) | ordinal as u32;
    dst[0..4].copy_from_slice(&c_len.to_be_bytes());
    dst[4..8].copy_from_slice(&raw_version_level.to_be_bytes());
    Ok(())
}

/// Parse and validate the 8-byte frame header at the front of `src`.
///
/// `s_len` is the total size of the framed buffer (header + payload); it is
/// validated against the decoded `c_len` so that a forged or truncated
/// header is rejected before any codec call is attempted.
///
/// `src` is never mutated; the header words are copied into locals before
/// big-endian conversion.
///
/// # Errors
///
/// Returns [`FrameError::HeaderInvalid`] if `src` is shorter than the header
/// or if `c_len + HEADER_SIZE > s_len`. Returns [`FrameError::LevelInvalid`]
/// if the recovered `level_enum` is outside the recognized domain — a
/// distinct variant from `HeaderInvalid` because callers bump a distinct
/// counter for each (an out-of-domain level is not a truncated/forged-length
/// frame, it is a request for an unrecognized level).
pub fn decode_header(src: &[u8], s_len: usize) -> Result<FrameHeader, FrameError> {
    if src.len() < HEADER_SIZE {
        return Err(FrameError::HeaderInvalid("source shorter than header"));
    }

    let c_len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]);
    let raw_version_level = u32::from_be_bytes([src[4], src[5], src[6], src[7]]);

    let version = raw_version_level >> 8;
    let ordinal = (raw_version_level & 0xFF) as u8;

    let c_len_usize = c_len as usize;
    let total = c_len_usize
        .checked_add(HEADER_SIZE)
        .ok_or(FrameError::HeaderInvalid("c_len overflows header arithmetic"))?;
    if total > s_len {
        return Err(FrameError::HeaderInvalid("c_len + header size exceeds s_len"));
    }

    let level_enum = level::from_wire_ordinal(ordinal)?;

    Ok(FrameHeader {
        c_len,
        version,
        level_enum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roundtrip_basic() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&mut buf, 100, 1, 3).unwrap();
        let header = decode_header(&buf, 108).unwrap();
        assert_eq!(header.c_len, 100);
        assert_eq!(header.version, 1);
        assert_eq!(header.level_enum, 3);
    }

    #[test]
    fn roundtrip_negative_fast_level() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&mut buf, 42, 1, -500).unwrap();
        let header = decode_header(&buf, 50).unwrap();
        assert_eq!(header.level_enum, -500);
    }

    #[test]
    fn version_overflow_is_rejected() {
        let mut buf = [0u8; HEADER_SIZE];
        let err = encode_header(&mut buf, 0, 1 << 24, 3).unwrap_err();
        assert!(matches!(err, FrameError::VersionOverflow(_)));
    }

    #[test]
    fn undersized_s_len_is_header_invalid() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&mut buf, 100, 1, 3).unwrap();
        // s_len too small to contain header + c_len bytes.
        let err = decode_header(&buf, 50).unwrap_err();
        assert!(matches!(err, FrameError::HeaderInvalid(_)));
    }

    #[test]
    fn forged_level_enum_is_rejected() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&mut buf, 0, 1, 3).unwrap();
        // Stomp the low byte of the packed word with an invalid level (0).
        buf[7] = 0;
        let err = decode_header(&buf, 8).unwrap_err();
        assert!(matches!(err, FrameError::LevelInvalid(_)));
    }

    #[test]
    fn big_endian_words_are_exact() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&mut buf, 0x0102_0304, 0x00AB_CDEF >> 8, 19).unwrap();
        let word0 = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let word1 = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let mut reencoded = [0u8; HEADER_SIZE];
        reencoded[0..4].copy_from_slice(&word0.to_be_bytes());
        reencoded[4..8].copy_from_slice(&word1.to_be_bytes());
        assert_eq!(buf, reencoded);
    }

    proptest! {
        #[test]
        fn prop_header_roundtrip(
            c_len in any::<u32>(),
            version in 0u32..=VERSION_MAX,
            level_enum in prop_oneof![1i32..=19, Just(-1), Just(-10), Just(-100), Just(-1000)],
        ) {
            let mut buf = [0u8; HEADER_SIZE];
            encode_header(&mut buf, c_len, version, level_enum).unwrap();
            let s_len = (c_len as u64 + HEADER_SIZE as u64).min(u32::MAX as u64) as usize;
            let header = decode_header(&buf, s_len).unwrap();
            prop_assert_eq!(header.c_len, c_len);
            prop_assert_eq!(header.version, version);
            prop_assert_eq!(header.level_enum, level_enum);
        }
    }
}
