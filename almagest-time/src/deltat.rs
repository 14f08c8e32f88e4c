//! Delta-T (TT - UT) across the supported era.
//!
//! Piecewise model over the decimal Gregorian year:
//!
//! - 1972 onward: the running IERS leap-second count plus the fixed
//!   TT - TAI offset of 32.184 s. The table covers the announcements from
//!   1972-01-01 (TAI - UTC = 10 s) through 2017-01-01 (37 s).
//! - 1600..1972: one polynomial per era. The coefficients interpolate
//!   observed delta-T values, with each era endpoint pinned to the
//!   neighbouring branch so the model is continuous at every boundary.
//! - Before 1600: the long-term parabola `-20 + 32 u^2`,
//!   `u = (year - 1820) / 100`.

use crate::error::{TimeError, TimeResult};
use crate::julian::JulianDay;
use almagest_core::constants::{SECONDS_PER_DAY, TT_TAI_OFFSET_SECONDS};

/// Smallest Julian Date the time model accepts.
pub const JD_MIN: f64 = -2.0e6;
/// Largest Julian Date the time model accepts.
pub const JD_MAX: f64 = 1.0e8;

/// TAI - UTC step table: (first JD in effect at 0h UTC, seconds).
const LEAP_SECONDS: [(f64, f64); 28] = [
    (2441317.5, 10.0), // 1972-01-01
    (2441499.5, 11.0), // 1972-07-01
    (2441683.5, 12.0), // 1973-01-01
    (2442048.5, 13.0), // 1974-01-01
    (2442413.5, 14.0), // 1975-01-01
    (2442778.5, 15.0), // 1976-01-01
    (2443144.5, 16.0), // 1977-01-01
    (2443509.5, 17.0), // 1978-01-01
    (2443874.5, 18.0), // 1979-01-01
    (2444239.5, 19.0), // 1980-01-01
    (2444786.5, 20.0), // 1981-07-01
    (2445151.5, 21.0), // 1982-07-01
    (2445516.5, 22.0), // 1983-07-01
    (2446247.5, 23.0), // 1985-07-01
    (2447161.5, 24.0), // 1988-01-01
    (2447892.5, 25.0), // 1990-01-01
    (2448257.5, 26.0), // 1991-01-01
    (2448804.5, 27.0), // 1992-07-01
    (2449169.5, 28.0), // 1993-07-01
    (2449534.5, 29.0), // 1994-07-01
    (2450083.5, 30.0), // 1996-01-01
    (2450630.5, 31.0), // 1997-07-01
    (2451179.5, 32.0), // 1999-01-01
    (2453736.5, 33.0), // 2006-01-01
    (2454832.5, 34.0), // 2009-01-01
    (2456109.5, 35.0), // 2012-07-01
    (2457204.5, 36.0), // 2015-07-01
    (2457754.5, 37.0), // 2017-01-01
];

// Era polynomials, ascending powers of (year - era start). Endpoints of
// each era reproduce the neighbouring branch value exactly.
const POLY_1955: [f64; 4] = [31.1, 0.4609523809523812, -0.016285714285714403, 0.0016190476190476102];

const POLY_1900: [f64; 7] = [
    -2.8,
    0.9554350649350645,
    0.0676926046176044,
    -0.003290800865800844,
    4.698773448773589e-6,
    1.3450216450216225e-6,
    -1.4300144300144307e-8,
];

const POLY_1800: [f64; 8] = [
    13.756124361158452,
    -1.7305897369034886,
    0.28558834652427806,
    -0.018342879199551385,
    5.486366987436929e-4,
    -8.281079136307209e-6,
    6.112291334908156e-8,
    -1.7532293276740982e-10,
];

const POLY_1700: [f64; 5] = [8.83, 0.1603, -5.9285e-3, 1.3336e-4, -8.517887563884157e-7];

const POLY_1600: [f64; 4] = [134.88, -3.1107673796791464, 0.028954425732301087, -1.0451751935509624e-4];

fn polynomial(coeffs: &[f64], t: f64) -> f64 {
    let mut acc = 0.0;
    for &c in coeffs.iter().rev() {
        acc = acc * t + c;
    }
    acc
}

/// Running TAI - UTC in seconds at a UT Julian Date.
///
/// Before the first table entry the initial 10 s applies; after the last
/// entry the count stays at its final value.
pub fn leap_seconds(jd: f64) -> f64 {
    let mut count = LEAP_SECONDS[0].1;
    for &(threshold, seconds) in LEAP_SECONDS.iter() {
        if jd >= threshold {
            count = seconds;
        } else {
            break;
        }
    }
    count
}

/// Delta-T (TT - UT) in seconds at a UT Julian Date.
pub fn delta_t_seconds(jd_ut: f64) -> TimeResult<f64> {
    if !jd_ut.is_finite() || !(JD_MIN..=JD_MAX).contains(&jd_ut) {
        return Err(TimeError::JdOutOfRange { jd: jd_ut });
    }

    let year = JulianDay::new(jd_ut).to_gregorian().decimal_year();

    let dt = if year >= 1972.0 {
        leap_seconds(jd_ut) + TT_TAI_OFFSET_SECONDS
    } else if year >= 1955.0 {
        polynomial(&POLY_1955, year - 1955.0)
    } else if year >= 1900.0 {
        polynomial(&POLY_1900, year - 1900.0)
    } else if year >= 1800.0 {
        polynomial(&POLY_1800, year - 1800.0)
    } else if year >= 1700.0 {
        polynomial(&POLY_1700, year - 1700.0)
    } else if year >= 1600.0 {
        polynomial(&POLY_1600, year - 1600.0)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };
    Ok(dt)
}

/// Delta-T in days, the unit Julian-Date arithmetic wants.
pub fn delta_t_days(jd_ut: f64) -> TimeResult<f64> {
    Ok(delta_t_seconds(jd_ut)? / SECONDS_PER_DAY)
}
