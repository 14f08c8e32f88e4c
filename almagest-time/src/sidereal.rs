//! Greenwich and local sidereal time, IAU 2006 expression.

use crate::deltat::delta_t_days;
use crate::error::TimeResult;
use crate::julian::JulianDay;
use almagest_core::angle::wrap_hours_0_24;
use almagest_core::constants::{DAYS_PER_JULIAN_CENTURY, DEG_TO_RAD, J2000_JD, SECONDS_PER_DAY};
use almagest_core::math::fmod;

/// Greenwich mean sidereal time in hours, [0, 24).
///
/// Splits the date at the preceding 0h UT boundary, evaluates the IAU 2006
/// GMST polynomial there (a TT polynomial with a UT1 linear term and the
/// `307.4771013 (T_t - T_u)` cross term), then advances by the elapsed UT
/// seconds at the sidereal rate.
pub fn gmst_hours(jd_ut: JulianDay) -> TimeResult<f64> {
    let jd = jd_ut.value();
    let jd0 = libm::floor(jd - 0.5) + 0.5;
    let secs = (jd - jd0) * SECONDS_PER_DAY;

    let tu = (jd0 - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    let tt = (jd0 + delta_t_days(jd0)? - J2000_JD) / DAYS_PER_JULIAN_CENTURY;

    let gmst0 = 24110.5493771
        + 8640184.79447825 * tu
        + 307.4771013 * (tt - tu)
        + 0.092772110 * tt * tt
        - 0.0000002926 * tt * tt * tt
        - 0.00000199708 * tt * tt * tt * tt
        - 0.000000002454 * tt * tt * tt * tt * tt;

    // d(gmst0)/d(UT) expressed as sidereal seconds per UT second.
    let rate = 1.0
        + (8640184.79447825 + 2.0 * 0.092772110 * tt
            - 3.0 * 0.0000002926 * tt * tt
            - 4.0 * 0.00000199708 * tt * tt * tt
            - 5.0 * 0.000000002454 * tt * tt * tt * tt)
            / (SECONDS_PER_DAY * DAYS_PER_JULIAN_CENTURY);

    let mut gmst = fmod(gmst0 + rate * secs, SECONDS_PER_DAY);
    if gmst < 0.0 {
        gmst += SECONDS_PER_DAY;
    }
    Ok(gmst / 3600.0)
}

/// Equation of the equinoxes in seconds of time (short form).
///
/// `delta_psi cos(eps)` with the dominant nutation term only:
/// `delta_psi = -17.20" sin(Omega)`.
pub fn equation_of_equinoxes_seconds(jd_ut: JulianDay) -> f64 {
    let jd = jd_ut.value();
    let t = (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY;

    let omega = (125.04 - 0.052954 * (jd - J2000_JD)) * DEG_TO_RAD;
    let delta_psi_arcsec = -17.20 * libm::sin(omega);
    let eps = (23.439291 - 0.0130042 * t) * DEG_TO_RAD;

    // 15 arcseconds of arc per second of time.
    delta_psi_arcsec * libm::cos(eps) / 15.0
}

/// Greenwich apparent sidereal time in hours, [0, 24).
pub fn gast_hours(jd_ut: JulianDay) -> TimeResult<f64> {
    let gmst = gmst_hours(jd_ut)?;
    Ok(wrap_hours_0_24(
        gmst + equation_of_equinoxes_seconds(jd_ut) / 3600.0,
    ))
}

/// Local mean sidereal time in hours for an east longitude in degrees.
pub fn lst_hours(jd_ut: JulianDay, longitude_deg: f64) -> TimeResult<f64> {
    Ok(wrap_hours_0_24(gmst_hours(jd_ut)? + longitude_deg / 15.0))
}

/// Local apparent sidereal time in hours for an east longitude in degrees.
pub fn last_hours(jd_ut: JulianDay, longitude_deg: f64) -> TimeResult<f64> {
    Ok(wrap_hours_0_24(gast_hours(jd_ut)? + longitude_deg / 15.0))
}
