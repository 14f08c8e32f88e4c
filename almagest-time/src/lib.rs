//! Time foundation: Julian Dates, the calendar, delta-T, time-scale
//! conversions and sidereal time.
//!
//! This crate provides:
//! - [`JulianDay`] and proleptic-Gregorian calendar conversions
//! - delta-T (TT - UT) over roughly thirty thousand years
//! - the UT/UTC/TT/TDB/TAI conversion chain
//! - GMST/GAST and local sidereal time per IAU 2006

pub mod deltat;
pub mod error;
pub mod julian;
pub mod scales;
pub mod sidereal;

pub use deltat::{delta_t_days, delta_t_seconds, leap_seconds};
pub use error::{TimeError, TimeResult};
pub use julian::{is_gregorian_leap_year, GregorianDate, JulianDay};
pub use scales::{
    tai_to_tt, tdb_to_tt, tt_to_tai, tt_to_tdb, tt_to_ut, ut_to_tt, ut_to_utc, utc_to_tt,
    utc_to_ut, TimeScale,
};
pub use sidereal::{equation_of_equinoxes_seconds, gast_hours, gmst_hours, last_hours, lst_hours};
