//! Geographic observer locations.

use crate::error::{CoordError, CoordResult};
use almagest_core::constants::DEG_TO_RAD;
use almagest_core::math::fmod;
use std::fmt;

/// A geographic location: geodetic latitude and east longitude in degrees,
/// altitude above the reference ellipsoid in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoLocation {
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
}

impl GeoLocation {
    /// Validating constructor.
    ///
    /// Longitude is wrapped into (-180, 180] first; latitude must already
    /// be within +/-90 degrees (there is nothing sensible to wrap it to).
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> CoordResult<Self> {
        if !latitude_deg.is_finite() || latitude_deg.abs() > 90.0 {
            return Err(CoordError::OutOfRange {
                quantity: "latitude",
                value: latitude_deg,
                message: "must be within +/-90 degrees".into(),
            });
        }
        if !longitude_deg.is_finite() {
            return Err(CoordError::OutOfRange {
                quantity: "longitude",
                value: longitude_deg,
                message: "must be finite".into(),
            });
        }
        let mut lon = fmod(longitude_deg, 360.0);
        if lon > 180.0 {
            lon -= 360.0;
        } else if lon <= -180.0 {
            lon += 360.0;
        }
        Ok(Self {
            latitude_deg,
            longitude_deg: lon,
            altitude_m,
        })
    }

    /// The Royal Observatory, Greenwich.
    pub fn greenwich() -> Self {
        Self {
            latitude_deg: 51.477928,
            longitude_deg: 0.0,
            altitude_m: 46.0,
        }
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg * DEG_TO_RAD
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg * DEG_TO_RAD
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:+.5} deg, {:+.5} deg, {:.0} m",
            self.latitude_deg, self.longitude_deg, self.altitude_m
        )
    }
}
