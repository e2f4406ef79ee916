// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Small numeric helpers shared by the drivers and controllers.

/// Clamp `x` into `[lo, hi]`.
///
/// Unlike `f32::clamp` this never panics: an inverted range returns `lo` or `hi`, and NaN passes
/// through unchanged so callers can decide what to do with it.
#[inline]
pub fn constrain(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}
