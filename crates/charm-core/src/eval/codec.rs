//! Fixed-point encoding of ability values.
//!
//! Ability magnitudes are stored as `i32` fractions of their cap with 26 bits
//! of precision. Seven summed values stay well inside `i32`, and a clamped
//! value times an `i32` weight stays inside `i64` for every ability.

/// Bits of precision taken from a raw value.
pub const ENCODED_STAT_BITS: u32 = 26;

/// Encoded value of a charm sitting exactly at its cap.
pub const ENCODED_STAT_SCALE: i32 = (1 << ENCODED_STAT_BITS) - 1;

/// Encode `raw` relative to `cap`, truncating toward zero.
///
/// Values past the cap (in either direction) saturate at `±ENCODED_STAT_SCALE`.
#[inline]
pub fn encode(raw: f64, cap: f64) -> i32 {
    debug_assert!(cap != 0.0, "ability cap must be nonzero");
    let rel = (raw / cap).clamp(-1.0, 1.0);
    (rel * ENCODED_STAT_SCALE as f64) as i32
}
