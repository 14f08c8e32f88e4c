//! Conversions between the UT, UTC, TT, TDB and TAI time scales.
//!
//! All functions are free and stateless; they take and return plain
//! [`JulianDay`] values on the documented scale. UT1 - UTC never exceeds
//! 0.9 s, which is below this engine's precision floor, so UT and UTC are
//! treated as the same scale.

use crate::deltat::delta_t_days;
use crate::error::TimeResult;
use crate::julian::JulianDay;
use almagest_core::constants::{J2000_JD, SECONDS_PER_DAY, TT_TAI_OFFSET_SECONDS};
use almagest_core::math::fmod;
use almagest_core::DEG_TO_RAD;

/// The time scales the conversion layer speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeScale {
    /// Earth-rotation time.
    Ut1,
    /// Coordinated universal time.
    Utc,
    /// Terrestrial time, the ephemeris argument.
    #[default]
    Tt,
    /// Barycentric dynamical time.
    Tdb,
    /// International atomic time.
    Tai,
}

/// UT -> TT: add delta-T.
pub fn ut_to_tt(jd_ut: JulianDay) -> TimeResult<JulianDay> {
    Ok(jd_ut.plus(delta_t_days(jd_ut.value())?))
}

/// TT -> UT by fixed-point iteration on `u = jd - dt(u)`.
///
/// Starts from `jd - dt(jd)` and stops on a 1e-8 day step or after five
/// rounds; the last iterate is returned either way, which is good to well
/// under a millisecond.
pub fn tt_to_ut(jd_tt: JulianDay) -> TimeResult<JulianDay> {
    let jd = jd_tt.value();
    let mut u = jd - delta_t_days(jd)?;
    for _ in 0..5 {
        let next = jd - delta_t_days(u)?;
        let step = (next - u).abs();
        u = next;
        if step < 1e-8 {
            break;
        }
    }
    Ok(JulianDay::new(u))
}

/// UT -> UTC. Identity at this engine's precision.
pub fn ut_to_utc(jd_ut: JulianDay) -> JulianDay {
    jd_ut
}

/// UTC -> UT. Identity at this engine's precision.
pub fn utc_to_ut(jd_utc: JulianDay) -> JulianDay {
    jd_utc
}

/// UTC -> TT.
pub fn utc_to_tt(jd_utc: JulianDay) -> TimeResult<JulianDay> {
    ut_to_tt(utc_to_ut(jd_utc))
}

fn tdb_correction_days(jd: f64) -> f64 {
    let g = fmod(357.53 + 0.98560028 * (jd - J2000_JD), 360.0) * DEG_TO_RAD;
    (0.001658 * libm::sin(g) + 0.000014 * libm::sin(2.0 * g)) / SECONDS_PER_DAY
}

/// TT -> TDB: the periodic relativistic correction, under 2 ms.
pub fn tt_to_tdb(jd_tt: JulianDay) -> JulianDay {
    jd_tt.plus(tdb_correction_days(jd_tt.value()))
}

/// TDB -> TT.
///
/// Applies the same correction with the sign flipped. Not iterated: the
/// error of evaluating g at TDB instead of TT is orders of magnitude below
/// delta-T's own uncertainty.
pub fn tdb_to_tt(jd_tdb: JulianDay) -> JulianDay {
    jd_tdb.plus(-tdb_correction_days(jd_tdb.value()))
}

/// TT -> TAI: subtract the fixed 32.184 s offset.
pub fn tt_to_tai(jd_tt: JulianDay) -> JulianDay {
    jd_tt.plus(-TT_TAI_OFFSET_SECONDS / SECONDS_PER_DAY)
}

/// TAI -> TT.
pub fn tai_to_tt(jd_tai: JulianDay) -> JulianDay {
    jd_tai.plus(TT_TAI_OFFSET_SECONDS / SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deltat::delta_t_days;

    #[test]
    fn ut_to_tt_adds_delta_t() {
        let ut = JulianDay::J2000;
        let tt = ut_to_tt(ut).unwrap();
        let dt = delta_t_days(ut.value()).unwrap();
        assert!((tt.value() - ut.value() - dt).abs() < 1e-12);
    }

    #[test]
    fn ut_tt_round_trip() {
        for &jd in &[2305447.5, 2378496.5, 2451545.0, 2469807.5] {
            let ut = JulianDay::new(jd);
            let back = tt_to_ut(ut_to_tt(ut).unwrap()).unwrap();
            assert!(
                (back.value() - ut.value()).abs() < 1e-8,
                "round trip at {jd}: {}",
                back.value()
            );
        }
    }

    #[test]
    fn utc_chain_matches_ut_chain() {
        let jd = JulianDay::from_gregorian(2020, 1, 1, 0.0).unwrap();
        let tt = utc_to_tt(jd).unwrap();
        let seconds = (tt.value() - jd.value()) * SECONDS_PER_DAY;
        assert!((68.0..71.0).contains(&seconds), "2020 offset = {seconds}");
        assert_eq!(ut_to_utc(jd), jd);
    }

    #[test]
    fn tdb_offset_stays_small() {
        // Peak-to-peak amplitude is about 3.3 ms over a year.
        for day in 0..366 {
            let tt = JulianDay::new(J2000_JD + day as f64);
            let tdb = tt_to_tdb(tt);
            let diff = (tdb.value() - tt.value()).abs();
            assert!(diff < 3e-5, "day {day}: TDB-TT = {diff} days");
        }
    }

    #[test]
    fn tdb_round_trip_tight() {
        let jd = JulianDay::from_gregorian(2020, 6, 15, 12.0).unwrap();
        let back = tt_to_tdb(tdb_to_tt(jd));
        assert!((back.value() - jd.value()).abs() < 1e-10);

        let back = tdb_to_tt(tt_to_tdb(jd));
        assert!((back.value() - jd.value()).abs() < 1e-10);
    }

    #[test]
    fn tai_is_a_fixed_offset() {
        let tt = JulianDay::J2000;
        let tai = tt_to_tai(tt);
        assert!(
            ((tt.value() - tai.value()) * SECONDS_PER_DAY - 32.184).abs() < 1e-9
        );
        assert!((tai_to_tt(tai).value() - tt.value()).abs() < 1e-12);
    }

    #[test]
    fn full_chain_round_trip() {
        let original = JulianDay::from_gregorian(2020, 1, 1, 0.0).unwrap();
        let tt = ut_to_tt(original).unwrap();
        let tdb = tt_to_tdb(tt);
        let tt2 = tdb_to_tt(tdb);
        let back = tt_to_ut(tt2).unwrap();
        assert!((back.value() - original.value()).abs() < 1e-8);
    }

    #[test]
    fn default_scale_is_tt() {
        assert_eq!(TimeScale::default(), TimeScale::Tt);
    }
}
