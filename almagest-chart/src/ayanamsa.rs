//! Ayanamsa systems and the sidereal zodiac.
//!
//! The ayanamsa is the accumulating offset between the tropical zodiac
//! (anchored to the moving equinox) and a sidereal zodiac (anchored to the
//! fixed stars). Each named system fixes a reference value; the drift is a
//! low-order function of time. Unknown system names resolve to Lahiri, the
//! most widely used convention.

use almagest_core::angle::wrap_deg_0_360;
use almagest_core::constants::{DAYS_PER_JULIAN_CENTURY, DAYS_PER_JULIAN_YEAR, J2000_JD};

/// Degrees of precession per Julian year adopted by the simplified
/// drift model (one degree per 72 years).
const DRIFT_DEG_PER_YEAR: f64 = 0.013888888;

/// Named ayanamsa conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ayanamsa {
    /// Fagan/Bradley, the primary Western sidereal calibration.
    FaganBradley,
    /// Lahiri (Chitrapaksha), the Indian standard.
    #[default]
    Lahiri,
    /// B.V. Raman.
    Raman,
    /// Krishnamurti Paddhati.
    KrishnamurtiPaddhati,
}

/// The 27 nakshatra names in order from 0 Aries sidereal.
pub const NAKSHATRA_NAMES: [&str; 27] = [
    "Ashwini",
    "Bharani",
    "Krittika",
    "Rohini",
    "Mrigashira",
    "Ardra",
    "Punarvasu",
    "Pushya",
    "Ashlesha",
    "Magha",
    "Purva Phalguni",
    "Uttara Phalguni",
    "Hasta",
    "Chitra",
    "Swati",
    "Vishakha",
    "Anuradha",
    "Jyeshtha",
    "Mula",
    "Purva Ashadha",
    "Uttara Ashadha",
    "Shravana",
    "Dhanishta",
    "Shatabhisha",
    "Purva Bhadrapada",
    "Uttara Bhadrapada",
    "Revati",
];

/// Width of one nakshatra: 13 degrees 20 minutes.
pub const NAKSHATRA_WIDTH_DEG: f64 = 40.0 / 3.0;

/// Width of one pada, a quarter nakshatra.
pub const PADA_WIDTH_DEG: f64 = 10.0 / 3.0;

impl Ayanamsa {
    /// Resolve a system by name, case-insensitive; anything unknown
    /// falls back to Lahiri.
    pub fn from_name(name: &str) -> Ayanamsa {
        match name.to_ascii_lowercase().as_str() {
            "fagan/bradley" | "fagan-bradley" | "faganbradley" => Ayanamsa::FaganBradley,
            "raman" => Ayanamsa::Raman,
            "kp" | "krishnamurti" | "krishnamurtipaddhati" => Ayanamsa::KrishnamurtiPaddhati,
            _ => Ayanamsa::Lahiri,
        }
    }

    /// Ayanamsa in degrees at a Julian Date.
    pub fn degrees(self, jd: f64) -> f64 {
        let t = (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
        let years = (jd - J2000_JD) / DAYS_PER_JULIAN_YEAR;
        match self {
            Ayanamsa::FaganBradley => 24.042506 + 0.000222 * t,
            Ayanamsa::Lahiri => {
                23.85 + DRIFT_DEG_PER_YEAR * (jd - J2000_JD - 6553.5) / DAYS_PER_JULIAN_YEAR
            }
            Ayanamsa::Raman => 22.370 + DRIFT_DEG_PER_YEAR * years,
            Ayanamsa::KrishnamurtiPaddhati => 23.850 + DRIFT_DEG_PER_YEAR * years,
        }
    }
}

/// Tropical to sidereal longitude under a given system.
pub fn tropical_to_sidereal(lon_tropical_deg: f64, jd: f64, system: Ayanamsa) -> f64 {
    wrap_deg_0_360(lon_tropical_deg - system.degrees(jd))
}

/// Sidereal to tropical longitude under a given system.
pub fn sidereal_to_tropical(lon_sidereal_deg: f64, jd: f64, system: Ayanamsa) -> f64 {
    wrap_deg_0_360(lon_sidereal_deg + system.degrees(jd))
}

/// Nakshatra index 0..=26 for a sidereal longitude.
pub fn nakshatra(lon_sidereal_deg: f64) -> usize {
    let lon = wrap_deg_0_360(lon_sidereal_deg);
    ((lon / NAKSHATRA_WIDTH_DEG) as usize) % 27
}

/// Pada 1..=4 within the nakshatra for a sidereal longitude.
pub fn nakshatra_pada(lon_sidereal_deg: f64) -> usize {
    let lon = wrap_deg_0_360(lon_sidereal_deg);
    let within = lon - (lon / NAKSHATRA_WIDTH_DEG).floor() * NAKSHATRA_WIDTH_DEG;
    (within / PADA_WIDTH_DEG) as usize + 1
}

/// Name of the nakshatra a sidereal longitude falls in.
pub fn nakshatra_name(lon_sidereal_deg: f64) -> &'static str {
    NAKSHATRA_NAMES[nakshatra(lon_sidereal_deg)]
}
