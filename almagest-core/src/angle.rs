//! Angle normalization helpers.
//!
//! Different quantities want different ranges:
//!
//! | Quantity | Range | Function |
//! |----------|-------|----------|
//! | Ecliptic longitude | [0, 360) deg | [`wrap_deg_0_360`] |
//! | Right ascension / sidereal time | [0, 24) h | [`wrap_hours_0_24`] |
//! | Any angle in radians | [0, 2pi) | [`wrap_0_2pi`] |
//!
//! Wrapping accepts any finite input and preserves the direction on the
//! circle; range validation of structured types (latitude, location) is the
//! job of the crates that own those types, after normalization.
//!
//! The helpers go through `fmod` rather than `%` so negative inputs wrap
//! the same way on every platform.

use crate::constants::{DEG_PER_HOUR, TWOPI};
use crate::math::fmod;

/// Wraps an angle in degrees to [0, 360).
pub fn wrap_deg_0_360(deg: f64) -> f64 {
    let mut r = fmod(deg, 360.0);
    if r < 0.0 {
        r += 360.0;
    }
    // A tiny negative remainder can round the sum up to the modulus.
    if r >= 360.0 {
        r = 0.0;
    }
    r
}

/// Wraps an angle in radians to [0, 2pi).
pub fn wrap_0_2pi(rad: f64) -> f64 {
    let mut r = fmod(rad, TWOPI);
    if r < 0.0 {
        r += TWOPI;
    }
    if r >= TWOPI {
        r = 0.0;
    }
    r
}

/// Wraps a time-like angle in hours to [0, 24).
pub fn wrap_hours_0_24(hours: f64) -> f64 {
    let mut r = fmod(hours, 24.0);
    if r < 0.0 {
        r += 24.0;
    }
    if r >= 24.0 {
        r = 0.0;
    }
    r
}

/// Degrees of arc to hours of right ascension.
#[inline]
pub fn deg_to_hours(deg: f64) -> f64 {
    deg / DEG_PER_HOUR
}

/// Hours of right ascension to degrees of arc.
#[inline]
pub fn hours_to_deg(hours: f64) -> f64 {
    hours * DEG_PER_HOUR
}

/// Forward arc from `a` to `b` in degrees, always in [0, 360).
pub fn arc_forward_deg(a: f64, b: f64) -> f64 {
    wrap_deg_0_360(b - a)
}
