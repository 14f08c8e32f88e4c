//! Frame rotations: ecliptic <-> equatorial, equatorial -> horizontal.
//!
//! Pure functions, no state. Angles in degrees, right ascension in hours,
//! consistent with the rest of the workspace.

use crate::spherical::Horizontal;
use almagest_core::angle::{deg_to_hours, hours_to_deg, wrap_deg_0_360, wrap_hours_0_24};
use almagest_core::constants::{DEG_TO_RAD, OBLIQUITY_J2000_DEG, RAD_TO_DEG};
use almagest_core::math::sincos;

/// Ecliptic (lon, lat) to equatorial (RA hours, dec degrees) for an
/// obliquity in degrees.
pub fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let (sin_lon, cos_lon) = sincos(lon_deg * DEG_TO_RAD);
    let (sin_lat, cos_lat) = sincos(lat_deg * DEG_TO_RAD);
    let (sin_eps, cos_eps) = sincos(obliquity_deg * DEG_TO_RAD);
    let tan_lat = sin_lat / cos_lat;

    let ra = libm::atan2(sin_lon * cos_eps - tan_lat * sin_eps, cos_lon) * RAD_TO_DEG;
    let dec = libm::asin(sin_lat * cos_eps + cos_lat * sin_eps * sin_lon) * RAD_TO_DEG;
    (wrap_hours_0_24(deg_to_hours(wrap_deg_0_360(ra))), dec)
}

/// Ecliptic to equatorial with the fixed J2000 obliquity.
pub fn ecliptic_to_equatorial_j2000(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    ecliptic_to_equatorial(lon_deg, lat_deg, OBLIQUITY_J2000_DEG)
}

/// Equatorial (RA hours, dec degrees) to ecliptic (lon, lat degrees) for
/// an obliquity in degrees.
pub fn equatorial_to_ecliptic(ra_hours: f64, dec_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let (sin_ra, cos_ra) = sincos(hours_to_deg(ra_hours) * DEG_TO_RAD);
    let (sin_dec, cos_dec) = sincos(dec_deg * DEG_TO_RAD);
    let (sin_eps, cos_eps) = sincos(obliquity_deg * DEG_TO_RAD);
    let tan_dec = sin_dec / cos_dec;

    let lon = libm::atan2(sin_ra * cos_eps + tan_dec * sin_eps, cos_ra) * RAD_TO_DEG;
    let lat = libm::asin(sin_dec * cos_eps - cos_dec * sin_eps * sin_ra) * RAD_TO_DEG;
    (wrap_deg_0_360(lon), lat)
}

/// Equatorial to ecliptic with the fixed J2000 obliquity.
pub fn equatorial_to_ecliptic_j2000(ra_hours: f64, dec_deg: f64) -> (f64, f64) {
    equatorial_to_ecliptic(ra_hours, dec_deg, OBLIQUITY_J2000_DEG)
}

/// Equatorial coordinates to the local horizon for an observer latitude
/// and local sidereal time.
///
/// Azimuth is reckoned from north through east (north 0, east 90).
pub fn equatorial_to_horizontal(
    ra_hours: f64,
    dec_deg: f64,
    latitude_deg: f64,
    lst_hours: f64,
) -> Horizontal {
    let hour_angle = (lst_hours - ra_hours) * 15.0 * DEG_TO_RAD;
    let (sin_h, cos_h) = sincos(hour_angle);
    let (sin_dec, cos_dec) = sincos(dec_deg * DEG_TO_RAD);
    let (sin_lat, cos_lat) = sincos(latitude_deg * DEG_TO_RAD);
    let tan_dec = sin_dec / cos_dec;

    let altitude = libm::asin(sin_lat * sin_dec + cos_lat * cos_dec * cos_h) * RAD_TO_DEG;
    let azimuth = wrap_deg_0_360(
        libm::atan2(sin_h, cos_h * sin_lat - tan_dec * cos_lat) * RAD_TO_DEG + 180.0,
    );
    Horizontal {
        azimuth_deg: azimuth,
        altitude_deg: altitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn equinox_points_are_fixed() {
        // The vernal equinox lies at RA 0 in both frames.
        let (ra, dec) = ecliptic_to_equatorial_j2000(0.0, 0.0);
        assert!(close(ra, 0.0, 1e-12) && close(dec, 0.0, 1e-12));

        let (lon, lat) = equatorial_to_ecliptic_j2000(0.0, 0.0);
        assert!(close(lon, 0.0, 1e-12) && close(lat, 0.0, 1e-12));
    }

    #[test]
    fn summer_solstice_point() {
        // Ecliptic (90, 0) maps to RA 6h, dec = obliquity.
        let (ra, dec) = ecliptic_to_equatorial_j2000(90.0, 0.0);
        assert!(close(ra, 6.0, 1e-9));
        assert!(close(dec, OBLIQUITY_J2000_DEG, 1e-9));
    }

    #[test]
    fn rotation_round_trip() {
        for &(lon, lat) in &[
            (0.0, 0.0),
            (45.0, 10.0),
            (123.4, -45.6),
            (250.0, 80.0),
            (359.9, -0.1),
        ] {
            let (ra, dec) = ecliptic_to_equatorial_j2000(lon, lat);
            let (lon2, lat2) = equatorial_to_ecliptic_j2000(ra, dec);
            assert!(close(lon2, lon, 1e-9), "lon {lon} -> {lon2}");
            assert!(close(lat2, lat, 1e-9), "lat {lat} -> {lat2}");
        }
    }

    #[test]
    fn meridian_transit_is_due_south() {
        // Equatorial star on the meridian for a northern observer.
        let h = equatorial_to_horizontal(12.0, 0.0, 51.5, 12.0);
        assert!(close(h.azimuth_deg, 180.0, 1e-9));
        assert!(close(h.altitude_deg, 90.0 - 51.5, 1e-9));
    }

    #[test]
    fn hour_angle_of_six_hours_sits_near_the_horizon() {
        // A star on the celestial equator rises due east.
        let h = equatorial_to_horizontal(6.0, 0.0, 51.5, 0.0);
        assert!(close(h.azimuth_deg, 90.0, 1e-6), "az = {}", h.azimuth_deg);
        assert!(h.altitude_deg.abs() < 1e-6, "alt = {}", h.altitude_deg);
    }

    #[test]
    fn pole_star_altitude_equals_latitude() {
        let h = equatorial_to_horizontal(3.0, 89.9999, 51.5, 17.25);
        assert!(close(h.altitude_deg, 51.5, 0.01));
    }
}
