//! Chart layer: house cusps and angles for the classical house systems,
//! plus the sidereal zodiac (ayanamsa, nakshatra).

pub mod ayanamsa;
pub mod error;
pub mod houses;

pub use ayanamsa::{
    nakshatra, nakshatra_name, nakshatra_pada, sidereal_to_tropical, tropical_to_sidereal,
    Ayanamsa, NAKSHATRA_NAMES,
};
pub use error::{ChartError, ChartResult};
pub use houses::{calculate, ChartAngles, HouseCusps, HouseSystem};
