//! Mean obliquity of the ecliptic.

use almagest_core::constants::{DAYS_PER_JULIAN_CENTURY, J2000_JD, OBLIQUITY_J2000_DEG};

/// Mean obliquity of date in degrees, linear in Julian centuries of TT.
///
/// The engine's frame work needs arcsecond-level obliquity at most; the
/// linear term of the IAU series covers the supported era well inside that.
pub fn mean_obliquity_deg(jd: f64) -> f64 {
    let t = (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    23.439291 - 0.0130042 * t
}

/// Mean obliquity of date in radians.
pub fn mean_obliquity_rad(jd: f64) -> f64 {
    mean_obliquity_deg(jd) * almagest_core::constants::DEG_TO_RAD
}

/// The fixed J2000 obliquity in degrees, for epoch-of-J2000 transforms.
pub const fn obliquity_j2000_deg() -> f64 {
    OBLIQUITY_J2000_DEG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_value() {
        let eps = mean_obliquity_deg(J2000_JD);
        assert!((eps - 23.439291).abs() < 1e-9);
        assert!((eps - OBLIQUITY_J2000_DEG).abs() < 1e-4);
    }

    #[test]
    fn decreases_slowly() {
        let now = mean_obliquity_deg(J2000_JD);
        let century_later = mean_obliquity_deg(J2000_JD + DAYS_PER_JULIAN_CENTURY);
        let diff = now - century_later;
        assert!((diff - 0.0130042).abs() < 1e-9);
    }

    #[test]
    fn radians_variant() {
        let jd = J2000_JD + 1000.0;
        let deg = mean_obliquity_deg(jd);
        let rad = mean_obliquity_rad(jd);
        assert!((rad - deg.to_radians()).abs() < 1e-12);
    }
}
