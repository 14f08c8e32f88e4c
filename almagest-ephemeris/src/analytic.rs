//! Analytic fallback series: reduced VSOP Sun, reduced ELP Moon, and the
//! lunar nodes.
//!
//! These cover the bodies a chart can't do without when no binary file is
//! on the search path. Accuracy targets are modest by design: about 0.01
//! degrees for the Sun and 0.17 degrees for the Moon; speeds are reported
//! as the mean rates.

use crate::body::Body;
use crate::error::{EphemerisError, EphemerisResult};
use almagest_core::angle::wrap_deg_0_360;
use almagest_core::constants::{AU_KM, DAYS_PER_JULIAN_CENTURY, DEG_TO_RAD, J2000_JD};

/// Mean daily motion of the Sun in ecliptic longitude, degrees.
pub const SUN_MEAN_MOTION_DEG: f64 = 0.9856474;
/// Mean daily motion of the Moon in ecliptic longitude, degrees.
pub const MOON_MEAN_MOTION_DEG: f64 = 13.176358;
/// Mean daily motion of the lunar node, degrees (retrograde).
pub const NODE_MEAN_MOTION_DEG: f64 = -0.0529539;

/// Mean Earth-Moon distance in AU, used as the nominal node distance.
const MEAN_LUNAR_DISTANCE_AU: f64 = 0.002569;

/// Geocentric ecliptic state: angles in degrees, distance in AU, rates
/// per day.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EclipticState {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub dist_au: f64,
    pub lon_speed_deg: f64,
    pub lat_speed_deg: f64,
    pub dist_speed_au: f64,
}

fn sin_deg(deg: f64) -> f64 {
    libm::sin(deg * DEG_TO_RAD)
}

fn cos_deg(deg: f64) -> f64 {
    libm::cos(deg * DEG_TO_RAD)
}

/// Geocentric Sun from the reduced solar theory.
pub fn sun_position(jd_tt: f64) -> EclipticState {
    let t = (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY;

    let l0 = wrap_deg_0_360(280.46646 + 36000.76983 * t + 0.0003032 * t * t);
    let m = wrap_deg_0_360(357.52911 + 35999.05029 * t - 0.0001537 * t * t);

    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * sin_deg(m)
        + (0.019993 - 0.000101 * t) * sin_deg(2.0 * m)
        + 0.000289 * sin_deg(3.0 * m);

    let lon = wrap_deg_0_360(l0 + c);
    let e = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;
    let v = m + c;
    let dist = 1.000001018 * (1.0 - e * e) / (1.0 + e * cos_deg(v));

    EclipticState {
        lon_deg: lon,
        lat_deg: 0.0,
        dist_au: dist,
        lon_speed_deg: SUN_MEAN_MOTION_DEG,
        lat_speed_deg: 0.0,
        dist_speed_au: 0.0,
    }
}

/// The five fundamental arguments of the lunar theory, degrees.
struct LunarArguments {
    /// Mean longitude.
    lp: f64,
    /// Mean elongation from the Sun.
    d: f64,
    /// Solar mean anomaly.
    m: f64,
    /// Lunar mean anomaly.
    mp: f64,
    /// Argument of latitude.
    f: f64,
}

fn lunar_arguments(t: f64) -> LunarArguments {
    LunarArguments {
        lp: wrap_deg_0_360(
            218.3164477 + 481267.88123421 * t - 0.0015786 * t * t + t * t * t / 538841.0
                - t * t * t * t / 65194000.0,
        ),
        d: wrap_deg_0_360(
            297.8501921 + 445267.1114034 * t - 0.0018819 * t * t + t * t * t / 545868.0
                - t * t * t * t / 113065000.0,
        ),
        m: wrap_deg_0_360(357.5291092 + 35999.0502909 * t - 0.0001536 * t * t + t * t * t / 24490000.0),
        mp: wrap_deg_0_360(
            134.9633964 + 477198.8675055 * t + 0.0087414 * t * t + t * t * t / 69699.0
                - t * t * t * t / 14712000.0,
        ),
        f: wrap_deg_0_360(
            93.2720950 + 483202.0175233 * t - 0.0036539 * t * t - t * t * t / 3526000.0
                + t * t * t * t / 863310000.0,
        ),
    }
}

/// Geocentric Moon from the reduced lunar theory: the ten largest
/// longitude terms, seven latitude terms and nine distance terms.
pub fn moon_position(jd_tt: f64) -> EclipticState {
    let t = (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    let args = lunar_arguments(t);
    let (d, m, mp, f) = (args.d, args.m, args.mp, args.f);

    let dl = 6.288774 * sin_deg(mp)
        + 1.274027 * sin_deg(2.0 * d - mp)
        + 0.658314 * sin_deg(2.0 * d)
        + 0.213618 * sin_deg(2.0 * mp)
        - 0.185116 * sin_deg(m)
        - 0.114332 * sin_deg(2.0 * f)
        + 0.058793 * sin_deg(2.0 * d - 2.0 * mp)
        + 0.057066 * sin_deg(2.0 * d - m - mp)
        + 0.053322 * sin_deg(2.0 * d + mp)
        + 0.045758 * sin_deg(2.0 * d - m);

    let db = 5.128122 * sin_deg(f)
        + 0.280602 * sin_deg(mp + f)
        + 0.277693 * sin_deg(mp - f)
        + 0.173237 * sin_deg(2.0 * d - f)
        + 0.055413 * sin_deg(2.0 * d - mp + f)
        + 0.046271 * sin_deg(2.0 * d - mp - f)
        + 0.032573 * sin_deg(2.0 * d + f);

    let dr_km = -20905.355 * cos_deg(mp)
        - 3699.111 * cos_deg(2.0 * d - mp)
        - 2955.968 * cos_deg(2.0 * d)
        - 569.925 * cos_deg(2.0 * mp)
        + 48.888 * cos_deg(m)
        - 3.149 * cos_deg(2.0 * f)
        + 246.158 * cos_deg(2.0 * d - 2.0 * mp)
        - 152.138 * cos_deg(2.0 * d - m - mp)
        - 170.733 * cos_deg(2.0 * d + mp);

    EclipticState {
        lon_deg: wrap_deg_0_360(args.lp + dl),
        lat_deg: db,
        dist_au: (385000.56 + dr_km) / AU_KM,
        lon_speed_deg: MOON_MEAN_MOTION_DEG,
        lat_speed_deg: 0.0,
        dist_speed_au: 0.0,
    }
}

/// Mean ascending node of the lunar orbit.
pub fn mean_node_position(jd_tt: f64) -> EclipticState {
    let t = (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    let omega = wrap_deg_0_360(
        125.0445479 - 1934.1362891 * t + 0.0020754 * t * t + t * t * t / 467441.0
            - t * t * t * t / 60616000.0,
    );
    EclipticState {
        lon_deg: omega,
        lat_deg: 0.0,
        dist_au: MEAN_LUNAR_DISTANCE_AU,
        lon_speed_deg: NODE_MEAN_MOTION_DEG,
        lat_speed_deg: 0.0,
        dist_speed_au: 0.0,
    }
}

/// True (osculating) ascending node: the mean node plus the principal
/// periodic corrections.
pub fn true_node_position(jd_tt: f64) -> EclipticState {
    let t = (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    let args = lunar_arguments(t);
    let (d, m, mp, f) = (args.d, args.m, args.mp, args.f);

    let mean = mean_node_position(jd_tt);
    let correction = -1.4979 * sin_deg(2.0 * (d - f))
        - 0.1500 * sin_deg(m)
        - 0.1226 * sin_deg(2.0 * d)
        + 0.1176 * sin_deg(2.0 * f)
        - 0.0801 * sin_deg(2.0 * (mp - f));

    EclipticState {
        lon_deg: wrap_deg_0_360(mean.lon_deg + correction),
        ..mean
    }
}

/// Analytic state for any body this module models.
pub fn body_position(body: Body, jd_tt: f64) -> EphemerisResult<EclipticState> {
    match body {
        Body::Sun => Ok(sun_position(jd_tt)),
        Body::Moon => Ok(moon_position(jd_tt)),
        Body::MeanNode => Ok(mean_node_position(jd_tt)),
        Body::TrueNode => Ok(true_node_position(jd_tt)),
        other => Err(EphemerisError::BodyUnsupported(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_at_j2000() {
        let sun = sun_position(J2000_JD);
        assert!(
            (270.0..290.0).contains(&sun.lon_deg),
            "lon = {}",
            sun.lon_deg
        );
        assert!((sun.lon_deg - 280.382).abs() < 0.01);
        assert_eq!(sun.lat_deg, 0.0);
        assert!((0.98..1.02).contains(&sun.dist_au));
        assert!((sun.dist_au - 0.983308).abs() < 1e-4);
    }

    #[test]
    fn sun_matches_the_reference_example() {
        // 1992 October 13.0 TT: true longitude 199.907, radius 0.99766 AU.
        let sun = sun_position(2448908.5);
        assert!((sun.lon_deg - 199.90987).abs() < 0.01, "lon = {}", sun.lon_deg);
        assert!((sun.dist_au - 0.99766).abs() < 1e-4);
    }

    #[test]
    fn sun_advances_about_a_degree_per_day() {
        let a = sun_position(J2000_JD);
        let b = sun_position(J2000_JD + 1.0);
        let mut advance = b.lon_deg - a.lon_deg;
        if advance < 0.0 {
            advance += 360.0;
        }
        assert!((advance - 1.0).abs() < 0.05, "advance = {advance}");
        assert!((a.lon_speed_deg - 0.9856474).abs() < 1e-12);
    }

    #[test]
    fn moon_at_j2000() {
        let moon = moon_position(J2000_JD);
        assert!((moon.lon_deg - 223.2749).abs() < 0.001, "lon = {}", moon.lon_deg);
        assert!((moon.lat_deg - 5.1766).abs() < 0.001);
        assert!((moon.dist_au * AU_KM - 402251.5).abs() < 1.0);
    }

    #[test]
    fn moon_matches_the_reference_example() {
        // 1992 April 12.0 TT: the full theory gives lon 133.1626,
        // lat -3.2291, distance 368409.7 km. The reduced series must stay
        // inside its documented accuracy target.
        let moon = moon_position(2448724.5);
        assert!((moon.lon_deg - 133.1626).abs() < 0.17, "lon = {}", moon.lon_deg);
        assert!((moon.lat_deg - (-3.2291)).abs() < 0.05);
        assert!((moon.dist_au * AU_KM - 368409.7).abs() < 200.0);
    }

    #[test]
    fn moon_speed_is_the_mean_rate() {
        let moon = moon_position(J2000_JD);
        assert!((11.0..15.0).contains(&moon.lon_speed_deg));
        assert_eq!(moon.lon_speed_deg, MOON_MEAN_MOTION_DEG);
        assert_eq!(moon.lat_speed_deg, 0.0);
        assert_eq!(moon.dist_speed_au, 0.0);
    }

    #[test]
    fn mean_node_at_j2000() {
        let node = mean_node_position(J2000_JD);
        assert!((node.lon_deg - 125.0445479).abs() < 1e-9);
        assert!(node.lon_speed_deg < 0.0);
    }

    #[test]
    fn mean_node_regresses() {
        let a = mean_node_position(J2000_JD);
        let b = mean_node_position(J2000_JD + 100.0);
        let mut drift = b.lon_deg - a.lon_deg;
        if drift > 180.0 {
            drift -= 360.0;
        }
        assert!(
            (drift - 100.0 * NODE_MEAN_MOTION_DEG).abs() < 0.1,
            "drift over 100 days = {drift}"
        );
    }

    #[test]
    fn true_node_oscillates_about_the_mean() {
        // The osculating node stays within about 1.7 degrees of the mean.
        for i in 0..200 {
            let jd = J2000_JD + i as f64 * 17.0;
            let mean = mean_node_position(jd).lon_deg;
            let true_ = true_node_position(jd).lon_deg;
            let mut diff = true_ - mean;
            if diff > 180.0 {
                diff -= 360.0;
            }
            if diff < -180.0 {
                diff += 360.0;
            }
            assert!(diff.abs() < 2.0, "jd {jd}: true - mean = {diff}");
        }
    }

    #[test]
    fn unsupported_bodies_are_refused() {
        for body in [Body::Mercury, Body::Jupiter, Body::Earth, Body::Pluto] {
            assert!(matches!(
                body_position(body, J2000_JD),
                Err(EphemerisError::BodyUnsupported(b)) if b == body
            ));
        }
        assert!(body_position(Body::Sun, J2000_JD).is_ok());
        assert!(body_position(Body::TrueNode, J2000_JD).is_ok());
    }
}
