//! Julian Date and proleptic-Gregorian calendar conversions.
//!
//! A [`JulianDay`] names an instant as a continuous day count from noon,
//! -4713-11-24. The time scale (UT, TT, TDB, ...) is not part of the value;
//! conversion functions in [`crate::scales`] take and return plain
//! `JulianDay`s and document which scale they expect.
//!
//! Calendar conversions use the Meeus algorithms over the proleptic
//! Gregorian calendar: there is no Julian-calendar cutover, and February 29
//! exists exactly when the Gregorian leap rule says it does, all the way
//! back.

use crate::error::{TimeError, TimeResult};
use almagest_core::constants::{J1900_JD, J2000_JD};
use std::cmp::Ordering;
use std::fmt;

/// A Julian Date as a plain day count.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JulianDay(f64);

/// A calendar instant in the proleptic Gregorian calendar.
///
/// `year` uses astronomical numbering (year 0 = 1 BCE). `hour` is a decimal
/// hour in [0, 24). This is a plain record: construction carries no
/// validation, [`JulianDay::from_gregorian`] is the validating boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GregorianDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: f64,
}

/// True when `year` has a February 29 under the Gregorian rule.
pub fn is_gregorian_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_gregorian_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

impl GregorianDate {
    /// Ordinal day of the year, 1-based (January 1 is day 1).
    pub fn day_of_year(&self) -> u32 {
        let cumulative = [0u32, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
        let mut doy = cumulative[(self.month - 1) as usize] + self.day;
        if self.month > 2 && is_gregorian_leap_year(self.year) {
            doy += 1;
        }
        doy
    }

    /// The year as a decimal, e.g. 2000-07-02 00:00 -> ~2000.5.
    pub fn decimal_year(&self) -> f64 {
        let length = if is_gregorian_leap_year(self.year) {
            366.0
        } else {
            365.0
        };
        self.year as f64 + ((self.day_of_year() - 1) as f64 + self.hour / 24.0) / length
    }
}

impl fmt::Display for GregorianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:09.6}h",
            self.year, self.month, self.day, self.hour
        )
    }
}

impl JulianDay {
    /// The J2000.0 epoch, JD 2451545.0.
    pub const J2000: JulianDay = JulianDay(J2000_JD);

    /// The J1900.0 epoch, JD 2415020.0.
    pub const J1900: JulianDay = JulianDay(J1900_JD);

    pub fn new(jd: f64) -> Self {
        Self(jd)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Julian Date for a proleptic-Gregorian calendar instant.
    ///
    /// Validates month, day (including the leap rule) and hour; fails with
    /// [`TimeError::InvalidDate`] otherwise.
    pub fn from_gregorian(year: i32, month: u32, day: u32, hour: f64) -> TimeResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(TimeError::InvalidDate {
                year,
                month,
                day,
                message: "month must be 1..=12".into(),
            });
        }
        let dim = days_in_month(year, month);
        if day < 1 || day > dim {
            let message = if month == 2 && day == 29 {
                format!("{year} is not a leap year")
            } else {
                format!("day must be 1..={dim}")
            };
            return Err(TimeError::InvalidDate {
                year,
                month,
                day,
                message,
            });
        }
        if !(0.0..24.0).contains(&hour) || !hour.is_finite() {
            return Err(TimeError::InvalidDate {
                year,
                month,
                day,
                message: format!("hour {hour} must be in [0, 24)"),
            });
        }

        let (mut y, mut m) = (year as f64, month as f64);
        if month <= 2 {
            y -= 1.0;
            m += 12.0;
        }
        let a = libm::floor(y / 100.0);
        let b = 2.0 - a + libm::floor(a / 4.0);
        let jd = libm::floor(365.25 * (y + 4716.0)) + libm::floor(30.6001 * (m + 1.0))
            + day as f64
            + b
            - 1524.5
            + hour / 24.0;
        Ok(Self(jd))
    }

    /// Inverse calendar conversion (Meeus), proleptic Gregorian throughout.
    pub fn to_gregorian(self) -> GregorianDate {
        let z = libm::floor(self.0 + 0.5);
        let f = self.0 + 0.5 - z;

        let alpha = libm::floor((z - 1867216.25) / 36524.25);
        let a = z + 1.0 + alpha - libm::floor(alpha / 4.0);
        let b = a + 1524.0;
        let c = libm::floor((b - 122.1) / 365.25);
        let d = libm::floor(365.25 * c);
        let e = libm::floor((b - d) / 30.6001);

        let day_frac = b - d - libm::floor(30.6001 * e) + f;
        let day = libm::floor(day_frac);
        let hour = (day_frac - day) * 24.0;

        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
        let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

        GregorianDate {
            year: year as i32,
            month: month as u32,
            day: day as u32,
            hour,
        }
    }

    /// This instant shifted forward by `days` (negative to go back).
    pub fn plus(self, days: f64) -> Self {
        Self(self.0 + days)
    }

    /// Difference `self - other` in days.
    pub fn minus(self, other: JulianDay) -> f64 {
        self.0 - other.0
    }

    pub fn compare(self, other: JulianDay) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for JulianDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

impl From<f64> for JulianDay {
    fn from(jd: f64) -> Self {
        Self(jd)
    }
}
