//! Position results handed to callers.

use crate::body::Body;
use almagest_coords::spherical::Ecliptic;
use almagest_coords::{cartesian_state_to_spherical, cartesian_to_ecliptic};
use almagest_core::constants::{DEG_TO_RAD, OBLIQUITY_J2000_DEG};
use almagest_core::math::sincos;

/// Reference frame a position is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceFrame {
    /// International celestial reference frame (the JPL native frame).
    Icrf,
    /// Mean equator and equinox of J2000.
    J2000,
    /// Mean equator and equinox of date.
    MeanOfDate,
    /// True equator and equinox of date.
    TrueOfDate,
    /// Ecliptic and equinox (the segmented-file native frame).
    Ecliptic,
}

impl ReferenceFrame {
    /// Whether the frame's fundamental plane is the equator.
    pub const fn is_equatorial(self) -> bool {
        matches!(
            self,
            ReferenceFrame::Icrf | ReferenceFrame::J2000 | ReferenceFrame::MeanOfDate
                | ReferenceFrame::TrueOfDate
        )
    }
}

/// Origin a position is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordinateType {
    Barycentric,
    Heliocentric,
    Geocentric,
    Topocentric,
}

/// A computed body state: cartesian position in AU (velocity in AU per
/// day when requested), tagged with its frame and origin.
///
/// Pure data, owned by the caller; projections to other representations
/// are methods, computed on demand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyPosition {
    pub body: Body,
    pub jd: f64,
    pub position: [f64; 3],
    pub velocity: Option<[f64; 3]>,
    pub frame: ReferenceFrame,
    pub coordinates: CoordinateType,
}

fn rotate_about_x(v: [f64; 3], sin_a: f64, cos_a: f64) -> [f64; 3] {
    [
        v[0],
        v[1] * cos_a + v[2] * sin_a,
        -v[1] * sin_a + v[2] * cos_a,
    ]
}

impl BodyPosition {
    /// Spherical view in the position's own frame (degrees, AU).
    pub fn spherical(&self) -> Ecliptic {
        cartesian_to_ecliptic(self.position)
    }

    /// Spherical view plus rates per day; rates are zero when the
    /// position carries no velocity.
    pub fn spherical_with_speeds(&self) -> (Ecliptic, f64, f64, f64) {
        match self.velocity {
            Some(vel) => cartesian_state_to_spherical(self.position, vel),
            None => (self.spherical(), 0.0, 0.0, 0.0),
        }
    }

    /// The same state rotated into the ecliptic frame.
    ///
    /// Equatorial frames rotate about the x axis by the J2000 obliquity;
    /// an already-ecliptic position is returned unchanged.
    pub fn in_ecliptic_frame(&self) -> BodyPosition {
        if !self.frame.is_equatorial() {
            return self.clone();
        }
        let (sin_eps, cos_eps) = sincos(OBLIQUITY_J2000_DEG * DEG_TO_RAD);
        BodyPosition {
            position: rotate_about_x(self.position, sin_eps, cos_eps),
            velocity: self.velocity.map(|v| rotate_about_x(v, sin_eps, cos_eps)),
            frame: ReferenceFrame::Ecliptic,
            ..self.clone()
        }
    }

    /// The same state rotated into the J2000 equatorial frame.
    pub fn in_equatorial_frame(&self) -> BodyPosition {
        if self.frame.is_equatorial() {
            return self.clone();
        }
        let (sin_eps, cos_eps) = sincos(OBLIQUITY_J2000_DEG * DEG_TO_RAD);
        BodyPosition {
            position: rotate_about_x(self.position, -sin_eps, cos_eps),
            velocity: self.velocity.map(|v| rotate_about_x(v, -sin_eps, cos_eps)),
            frame: ReferenceFrame::J2000,
            ..self.clone()
        }
    }

    /// Project into `target`, rotating across the given obliquity when
    /// the fundamental plane changes. The result carries the target tag
    /// even when no rotation was needed.
    pub fn to_frame(&self, target: ReferenceFrame, obliquity_deg: f64) -> BodyPosition {
        if target.is_equatorial() == self.frame.is_equatorial() {
            let mut same_plane = self.clone();
            same_plane.frame = target;
            return same_plane;
        }
        let (sin_eps, cos_eps) = sincos(obliquity_deg * DEG_TO_RAD);
        let sign = if target.is_equatorial() { -1.0 } else { 1.0 };
        BodyPosition {
            position: rotate_about_x(self.position, sign * sin_eps, cos_eps),
            velocity: self
                .velocity
                .map(|v| rotate_about_x(v, sign * sin_eps, cos_eps)),
            frame: target,
            ..self.clone()
        }
    }
}
