//! Floating point color blending
//!
//! Plain linear RGB, no gamma handling. Channel results are truncated
//! towards zero when converted back to 8 bits.

use crate::color::Rgb;

/// Linear interpolation between two scalars
///
/// `t` is expected in `[0, 1]`; the result then stays between `a` and `b`.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp8(a: u8, b: u8, t: f32) -> u8 {
    // Exact at both ends and monotonic in `t`, so the result never leaves
    // the `a..=b` interval after truncation
    lerp_f32(f32::from(a), f32::from(b), t) as u8
}

/// Interpolate two colors, `t = 0` gives `a`, `t = 1` gives `b`
#[inline]
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    Rgb {
        r: lerp8(a.r, b.r, t),
        g: lerp8(a.g, b.g, t),
        b: lerp8(a.b, b.b, t),
    }
}

/// Blend `color` over `background`.
///
/// `transparency` is the share of the background that shows through:
/// `0.0` replaces the background, `1.0` leaves it untouched.
#[inline]
pub fn blend_over(background: Rgb, color: Rgb, transparency: f32) -> Rgb {
    lerp_rgb(color, background, transparency)
}
