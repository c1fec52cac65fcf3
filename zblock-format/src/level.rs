//! Level enum <-> codec level translation, and the on-disk ordinal encoding
//! that lets the sparse fast-level tags survive being packed into a single
//! header byte.
//!
//! The storage layer expresses compression intent as a closed `level_enum`
//! domain: "normal" levels `1..=19`, plus a sparse set of negative "fast"
//! tags. Everywhere outside this module, and across the public API,
//! `level_enum` is the signed value the caller passed in (e.g. `-500`) —
//! that is the value `to_codec_level` accepts and the value the frame
//! header is documented as carrying. A handful of the fast tags (`-500`,
//! `-1000`) do not fit in the header's 8-bit field as a raw two's-complement
//! byte, so [`crate::header`] stores a compact ordinal instead and this
//! module is the only place that knows the ordinal table; callers never see
//! it.

use crate::error::FrameError;

/// The sparse negative "fast" level tags, in the order `zstd`'s own table
/// lists them. Not a contiguous range: `-11` is not a valid level even
/// though it sits between two valid tags. This order also fixes the
/// on-disk ordinal assigned to each tag (see [`to_wire_ordinal`]).
const FAST_LEVELS: &[i32] = &[
    -1, -2, -3, -4, -5, -6, -7, -8, -9, -10, -20, -30, -40, -50, -60, -70, -80, -90, -100, -500,
    -1000,
];

/// Lowest "normal" level.
const NORMAL_MIN: i32 = 1;
/// Highest "normal" level.
const NORMAL_MAX: i32 = 19;

/// First ordinal assigned to a fast tag (ordinals `1..=19` are reserved for
/// the normal levels, which encode as themselves).
const FAST_ORDINAL_BASE: u8 = 20;

/// Returns `true` if `level_enum` is in the recognized domain.
pub fn is_valid(level_enum: i32) -> bool {
    (NORMAL_MIN..=NORMAL_MAX).contains(&level_enum) || FAST_LEVELS.contains(&level_enum)
}

/// Translate a storage-layer `level_enum` to the signed level the codec
/// accepts directly.
///
/// Positive enums map to themselves (they already are codec levels); the
/// fast tags also map to themselves (the codec interprets negative levels
/// as its own fast-mode table). The only real work this function does is
/// reject anything outside the closed domain, including values that sit
/// between two valid fast tags.
pub fn to_codec_level(level_enum: i32) -> Result<i32, FrameError> {
    if is_valid(level_enum) {
        Ok(level_enum)
    } else {
        Err(FrameError::LevelInvalid(level_enum))
    }
}

/// Encode `level_enum` as the single-byte ordinal stored in the frame
/// header's low 8 bits.
///
/// Normal levels `1..=19` encode as themselves. Fast tags encode as
/// `FAST_ORDINAL_BASE + index`, since several of them (`-500`, `-1000`)
/// cannot round-trip through an 8-bit two's-complement byte directly.
pub(crate) fn to_wire_ordinal(level_enum: i32) -> Result<u8, FrameError> {
    if (NORMAL_MIN..=NORMAL_MAX).contains(&level_enum) {
        return Ok(level_enum as u8);
    }
    match FAST_LEVELS.iter().position(|&l| l == level_enum) {
        Some(index) => Ok(FAST_ORDINAL_BASE + index as u8),
        None => Err(FrameError::LevelInvalid(level_enum)),
    }
}

/// Reverse of [`to_wire_ordinal`]: recover `level_enum` from the header's
/// stored ordinal byte.
pub(crate) fn from_wire_ordinal(ordinal: u8) -> Result<i32, FrameError> {
    if (NORMAL_MIN as u8..=NORMAL_MAX as u8).contains(&ordinal) {
        return Ok(ordinal as i32);
    }
    let index = ordinal.checked_sub(FAST_ORDINAL_BASE).ok_or(FrameError::LevelInvalid(ordinal as i32))?;
    FAST_LEVELS
        .get(index as usize)
        .copied()
        .ok_or(FrameError::LevelInvalid(ordinal as i32))
}
