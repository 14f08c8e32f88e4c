//! Spherical coordinate records and cartesian conversions.
//!
//! Angles live in degrees (right ascension in hours), distances in
//! whatever unit the caller works in; these functions never rescale.

use almagest_core::angle::{deg_to_hours, hours_to_deg, wrap_deg_0_360};
use almagest_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use almagest_core::math::sincos;

/// Ecliptic spherical coordinates: longitude, latitude, distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ecliptic {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub distance: f64,
}

/// Equatorial spherical coordinates: right ascension in hours,
/// declination in degrees, distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equatorial {
    pub ra_hours: f64,
    pub dec_deg: f64,
    pub distance: f64,
}

/// Horizon coordinates: azimuth (north 0, east 90) and altitude, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horizontal {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
}

/// Cartesian vector to ecliptic spherical coordinates.
pub fn cartesian_to_ecliptic(v: [f64; 3]) -> Ecliptic {
    let r = libm::sqrt(v[0] * v[0] + v[1] * v[1] + v[2] * v[2]);
    if r == 0.0 {
        return Ecliptic {
            lon_deg: 0.0,
            lat_deg: 0.0,
            distance: 0.0,
        };
    }
    Ecliptic {
        lon_deg: wrap_deg_0_360(libm::atan2(v[1], v[0]) * RAD_TO_DEG),
        lat_deg: libm::asin(v[2] / r) * RAD_TO_DEG,
        distance: r,
    }
}

/// Ecliptic spherical coordinates to a cartesian vector.
pub fn ecliptic_to_cartesian(e: &Ecliptic) -> [f64; 3] {
    let (sin_lon, cos_lon) = sincos(e.lon_deg * DEG_TO_RAD);
    let (sin_lat, cos_lat) = sincos(e.lat_deg * DEG_TO_RAD);
    [
        e.distance * cos_lat * cos_lon,
        e.distance * cos_lat * sin_lon,
        e.distance * sin_lat,
    ]
}

/// Cartesian vector (equatorial frame) to right ascension and declination.
pub fn cartesian_to_equatorial(v: [f64; 3]) -> Equatorial {
    let e = cartesian_to_ecliptic(v);
    Equatorial {
        ra_hours: deg_to_hours(e.lon_deg),
        dec_deg: e.lat_deg,
        distance: e.distance,
    }
}

/// Right ascension and declination to a cartesian vector.
pub fn equatorial_to_cartesian(eq: &Equatorial) -> [f64; 3] {
    ecliptic_to_cartesian(&Ecliptic {
        lon_deg: hours_to_deg(eq.ra_hours),
        lat_deg: eq.dec_deg,
        distance: eq.distance,
    })
}

/// Spherical state (angles in degrees, rates per day) to cartesian
/// position and velocity.
pub fn spherical_state_to_cartesian(
    sph: &Ecliptic,
    lon_speed_deg: f64,
    lat_speed_deg: f64,
    dist_speed: f64,
) -> ([f64; 3], [f64; 3]) {
    let (sin_lon, cos_lon) = sincos(sph.lon_deg * DEG_TO_RAD);
    let (sin_lat, cos_lat) = sincos(sph.lat_deg * DEG_TO_RAD);
    let r = sph.distance;
    let dlon = lon_speed_deg * DEG_TO_RAD;
    let dlat = lat_speed_deg * DEG_TO_RAD;
    let dr = dist_speed;

    let pos = [r * cos_lat * cos_lon, r * cos_lat * sin_lon, r * sin_lat];
    let vel = [
        dr * cos_lat * cos_lon - r * sin_lat * dlat * cos_lon - r * cos_lat * sin_lon * dlon,
        dr * cos_lat * sin_lon - r * sin_lat * dlat * sin_lon + r * cos_lat * cos_lon * dlon,
        dr * sin_lat + r * cos_lat * dlat,
    ];
    (pos, vel)
}

/// Cartesian position and velocity to spherical state.
///
/// Returns the spherical coordinates plus (lon, lat, distance) rates per
/// day, angles in degrees. A zero-length position yields an all-zero state.
pub fn cartesian_state_to_spherical(pos: [f64; 3], vel: [f64; 3]) -> (Ecliptic, f64, f64, f64) {
    let sph = cartesian_to_ecliptic(pos);
    let rho2 = pos[0] * pos[0] + pos[1] * pos[1];
    let r = sph.distance;
    if r == 0.0 || rho2 == 0.0 {
        return (sph, 0.0, 0.0, 0.0);
    }
    let rho = libm::sqrt(rho2);
    let dr = (pos[0] * vel[0] + pos[1] * vel[1] + pos[2] * vel[2]) / r;
    let dlon = (pos[0] * vel[1] - pos[1] * vel[0]) / rho2;
    let dlat = (vel[2] * r - pos[2] * dr) / (r * r) / (rho / r);
    (sph, dlon * RAD_TO_DEG, dlat * RAD_TO_DEG, dr)
}
