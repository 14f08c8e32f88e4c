//! Coordinate layer: observer locations, obliquity and the pure
//! transformations between cartesian, ecliptic, equatorial and horizontal
//! frames.

pub mod error;
pub mod location;
pub mod obliquity;
pub mod spherical;
pub mod transforms;

pub use error::{CoordError, CoordResult};
pub use location::GeoLocation;
pub use obliquity::{mean_obliquity_deg, mean_obliquity_rad};
pub use spherical::{
    cartesian_state_to_spherical, cartesian_to_ecliptic, cartesian_to_equatorial,
    ecliptic_to_cartesian, equatorial_to_cartesian, spherical_state_to_cartesian, Ecliptic,
    Equatorial, Horizontal,
};
pub use transforms::{
    ecliptic_to_equatorial, ecliptic_to_equatorial_j2000, equatorial_to_ecliptic,
    equatorial_to_ecliptic_j2000, equatorial_to_horizontal,
};
