//! House cusps and chart angles for fifteen house systems.
//!
//! The shared chain is LST -> ARMC -> obliquity -> MC and Ascendant; each
//! system then fills the intermediate cusps its own way. All angles are
//! ecliptic longitudes in degrees, [0, 360).
//!
//! Polar behavior is a fixed part of each system's contract: Placidus and
//! Koch refuse latitudes beyond the polar limit, Topocentric and
//! Alcabitius substitute Porphyry cusps there, and every other system is
//! defined at any latitude.

use crate::error::{ChartError, ChartResult};
use almagest_coords::{equatorial_to_ecliptic, equatorial_to_horizontal, mean_obliquity_deg,
    GeoLocation};
use almagest_core::angle::{arc_forward_deg, wrap_deg_0_360};
use almagest_core::constants::DEG_TO_RAD;
use almagest_core::math::sincos;
use almagest_core::RAD_TO_DEG;
use almagest_time::{lst_hours, JulianDay};

/// Latitude beyond which the time-based systems are undefined.
pub const POLAR_LIMIT_DEG: f64 = 66.0;

/// The supported house systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HouseSystem {
    Placidus,
    Koch,
    Porphyry,
    Regiomontanus,
    Campanus,
    Equal,
    EqualMc,
    WholeSign,
    Vehlow,
    Alcabitius,
    Topocentric,
    Morinus,
    Meridian,
    Azimuthal,
    Gauquelin,
}

impl HouseSystem {
    pub const ALL: [HouseSystem; 15] = [
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Porphyry,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
        HouseSystem::Equal,
        HouseSystem::EqualMc,
        HouseSystem::WholeSign,
        HouseSystem::Vehlow,
        HouseSystem::Alcabitius,
        HouseSystem::Topocentric,
        HouseSystem::Morinus,
        HouseSystem::Meridian,
        HouseSystem::Azimuthal,
        HouseSystem::Gauquelin,
    ];

    /// One-letter system code, the conventional external identifier.
    pub const fn code(self) -> char {
        match self {
            HouseSystem::Placidus => 'P',
            HouseSystem::Koch => 'K',
            HouseSystem::Porphyry => 'O',
            HouseSystem::Regiomontanus => 'R',
            HouseSystem::Campanus => 'C',
            HouseSystem::Equal => 'A',
            HouseSystem::EqualMc => 'D',
            HouseSystem::WholeSign => 'W',
            HouseSystem::Vehlow => 'V',
            HouseSystem::Alcabitius => 'B',
            HouseSystem::Topocentric => 'T',
            HouseSystem::Morinus => 'M',
            HouseSystem::Meridian => 'X',
            HouseSystem::Azimuthal => 'H',
            HouseSystem::Gauquelin => 'G',
        }
    }

    /// Look a system up by code, case-insensitive.
    pub fn from_code(code: char) -> Option<HouseSystem> {
        let upper = code.to_ascii_uppercase();
        HouseSystem::ALL.iter().copied().find(|s| s.code() == upper)
    }

    pub const fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "Placidus",
            HouseSystem::Koch => "Koch",
            HouseSystem::Porphyry => "Porphyry",
            HouseSystem::Regiomontanus => "Regiomontanus",
            HouseSystem::Campanus => "Campanus",
            HouseSystem::Equal => "Equal",
            HouseSystem::EqualMc => "Equal (MC)",
            HouseSystem::WholeSign => "Whole Sign",
            HouseSystem::Vehlow => "Vehlow",
            HouseSystem::Alcabitius => "Alcabitius",
            HouseSystem::Topocentric => "Topocentric",
            HouseSystem::Morinus => "Morinus",
            HouseSystem::Meridian => "Meridian",
            HouseSystem::Azimuthal => "Azimuthal",
            HouseSystem::Gauquelin => "Gauquelin",
        }
    }

    /// Look a system up by name, case-insensitive.
    pub fn from_name(name: &str) -> Option<HouseSystem> {
        HouseSystem::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Number of cusps the system produces.
    pub const fn cusp_count(self) -> usize {
        match self {
            HouseSystem::Gauquelin => 36,
            _ => 12,
        }
    }
}

/// The chart angle set derived alongside the cusps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartAngles {
    pub ascendant: f64,
    pub mc: f64,
    /// Right ascension of the meridian, degrees.
    pub armc: f64,
    pub vertex: f64,
    pub equatorial_ascendant: f64,
    pub co_ascendant_koch: f64,
    pub co_ascendant_munkasey: f64,
    pub polar_ascendant: f64,
}

/// Cusps plus angles for one computed chart.
///
/// Cusps are 1-indexed: `cusp(1)` through `cusp(12)`, or `cusp(36)` for
/// Gauquelin sectors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HouseCusps {
    pub system: HouseSystem,
    cusps: Vec<f64>,
    pub angles: ChartAngles,
}

impl HouseCusps {
    /// Cusp `i`, 1-indexed.
    pub fn cusp(&self, i: usize) -> f64 {
        self.cusps[i]
    }

    /// The raw cusp array, slot 0 unused.
    pub fn cusps(&self) -> &[f64] {
        &self.cusps
    }

    pub fn count(&self) -> usize {
        self.cusps.len() - 1
    }

    pub fn ascendant(&self) -> f64 {
        self.angles.ascendant
    }

    pub fn mc(&self) -> f64 {
        self.angles.mc
    }

    pub fn descendant(&self) -> f64 {
        wrap_deg_0_360(self.angles.ascendant + 180.0)
    }

    pub fn ic(&self) -> f64 {
        wrap_deg_0_360(self.angles.mc + 180.0)
    }
}

fn sin_deg(deg: f64) -> f64 {
    libm::sin(deg * DEG_TO_RAD)
}

fn cos_deg(deg: f64) -> f64 {
    libm::cos(deg * DEG_TO_RAD)
}

fn tan_deg(deg: f64) -> f64 {
    libm::tan(deg * DEG_TO_RAD)
}

/// Ascendant-type point: the ecliptic longitude rising across the horizon
/// of a (possibly fictitious) observer with the given pole latitude, for
/// a meridian at `armc_deg`. Normalized into the rising hemisphere.
fn ascendant_point(armc_deg: f64, pole_deg: f64, eps_deg: f64) -> f64 {
    let (sin_armc, cos_armc) = sincos(armc_deg * DEG_TO_RAD);
    let (sin_eps, cos_eps) = sincos(eps_deg * DEG_TO_RAD);
    let lon = libm::atan2(
        cos_armc,
        -(sin_armc * cos_eps + tan_deg(pole_deg) * sin_eps),
    );
    wrap_deg_0_360(lon * RAD_TO_DEG)
}

/// Ecliptic longitude of the ecliptic point with the given right
/// ascension (the MC-type projection along hour circles).
fn ecliptic_lon_of_ra(ra_deg: f64, eps_deg: f64) -> f64 {
    let (sin_ra, cos_ra) = sincos(ra_deg * DEG_TO_RAD);
    wrap_deg_0_360(libm::atan2(sin_ra, cos_ra * cos_deg(eps_deg)) * RAD_TO_DEG)
}

/// Declination of the ecliptic point with the given right ascension.
fn ecliptic_dec_of_ra(ra_deg: f64, eps_deg: f64) -> f64 {
    libm::atan(tan_deg(eps_deg) * sin_deg(ra_deg)) * RAD_TO_DEG
}

/// Semi-diurnal arc in degrees for a declination at an observer latitude.
fn semi_diurnal_arc_deg(dec_deg: f64, lat_deg: f64) -> f64 {
    let cos_ha = (-tan_deg(dec_deg) * tan_deg(lat_deg)).clamp(-1.0, 1.0);
    libm::acos(cos_ha) * RAD_TO_DEG
}

fn opposite(deg: f64) -> f64 {
    wrap_deg_0_360(deg + 180.0)
}

/// A twelve-cusp array with the four angles pre-filled.
fn angular_skeleton(asc: f64, mc: f64) -> Vec<f64> {
    let mut cusps = vec![0.0; 13];
    cusps[1] = asc;
    cusps[4] = opposite(mc);
    cusps[7] = opposite(asc);
    cusps[10] = mc;
    cusps
}

fn equal_from(start: f64) -> Vec<f64> {
    let mut cusps = vec![0.0; 13];
    for i in 1..=12 {
        cusps[i] = wrap_deg_0_360(start + (i as f64 - 1.0) * 30.0);
    }
    cusps
}

/// Porphyry: trisect each zodiacal quadrant between the angles.
fn porphyry(asc: f64, mc: f64) -> Vec<f64> {
    let mut cusps = angular_skeleton(asc, mc);
    let ic = cusps[4];
    let dsc = cusps[7];

    let q1 = arc_forward_deg(asc, ic);
    cusps[2] = wrap_deg_0_360(asc + q1 / 3.0);
    cusps[3] = wrap_deg_0_360(asc + 2.0 * q1 / 3.0);

    let q2 = arc_forward_deg(ic, dsc);
    cusps[5] = wrap_deg_0_360(ic + q2 / 3.0);
    cusps[6] = wrap_deg_0_360(ic + 2.0 * q2 / 3.0);

    let q3 = arc_forward_deg(dsc, mc);
    cusps[8] = wrap_deg_0_360(dsc + q3 / 3.0);
    cusps[9] = wrap_deg_0_360(dsc + 2.0 * q3 / 3.0);

    let q4 = arc_forward_deg(mc, asc);
    cusps[11] = wrap_deg_0_360(mc + q4 / 3.0);
    cusps[12] = wrap_deg_0_360(mc + 2.0 * q4 / 3.0);

    cusps
}

/// Placidus: each intermediate cusp is the point whose hour angle is the
/// given fraction of its own semi-arc. Solved by fixed-point iteration on
/// the cusp's right ascension.
fn placidus_ra(armc: f64, lat: f64, eps: f64, base: f64, factor: f64, start: f64) -> f64 {
    let mut ra = start;
    for _ in 0..50 {
        let dec = ecliptic_dec_of_ra(ra, eps);
        let next = armc + base + factor * semi_diurnal_arc_deg(dec, lat);
        if (next - ra).abs() < 1e-11 {
            return next;
        }
        ra = next;
    }
    ra
}

fn placidus(asc: f64, mc: f64, armc: f64, lat: f64, eps: f64) -> Vec<f64> {
    let mut cusps = angular_skeleton(asc, mc);
    let ra11 = placidus_ra(armc, lat, eps, 0.0, 1.0 / 3.0, armc + 30.0);
    let ra12 = placidus_ra(armc, lat, eps, 0.0, 2.0 / 3.0, armc + 60.0);
    let ra2 = placidus_ra(armc, lat, eps, 60.0, 2.0 / 3.0, armc + 120.0);
    let ra3 = placidus_ra(armc, lat, eps, 120.0, 1.0 / 3.0, armc + 150.0);

    cusps[11] = ecliptic_lon_of_ra(ra11, eps);
    cusps[12] = ecliptic_lon_of_ra(ra12, eps);
    cusps[2] = ecliptic_lon_of_ra(ra2, eps);
    cusps[3] = ecliptic_lon_of_ra(ra3, eps);
    cusps[5] = opposite(cusps[11]);
    cusps[6] = opposite(cusps[12]);
    cusps[8] = opposite(cusps[2]);
    cusps[9] = opposite(cusps[3]);
    cusps
}

/// Koch: intermediate cusps through the ascendant formula at meridian
/// offsets shifted by thirds of the MC's ascensional difference.
fn koch(asc: f64, mc: f64, armc: f64, lat: f64, eps: f64) -> Vec<f64> {
    let dec_mc = ecliptic_dec_of_ra(armc, eps);
    let ad = libm::asin((tan_deg(dec_mc) * tan_deg(lat)).clamp(-1.0, 1.0)) * RAD_TO_DEG;
    let ad3 = ad / 3.0;

    let mut cusps = angular_skeleton(asc, mc);
    cusps[11] = ascendant_point(armc - 60.0 - 2.0 * ad3, lat, eps);
    cusps[12] = ascendant_point(armc - 30.0 - ad3, lat, eps);
    cusps[2] = ascendant_point(armc + 30.0 + ad3, lat, eps);
    cusps[3] = ascendant_point(armc + 60.0 + 2.0 * ad3, lat, eps);
    cusps[5] = opposite(cusps[11]);
    cusps[6] = opposite(cusps[12]);
    cusps[8] = opposite(cusps[2]);
    cusps[9] = opposite(cusps[3]);
    cusps
}

/// Regiomontanus: equator divided into 30-degree arcs from the meridian;
/// each division's house circle becomes an ascendant problem at the pole
/// latitude `atan(tan(lat) sin(D))`.
fn regiomontanus(asc: f64, mc: f64, armc: f64, lat: f64, eps: f64) -> Vec<f64> {
    let mut cusps = angular_skeleton(asc, mc);
    for (house, d) in [(11usize, 30.0f64), (12, 60.0), (2, 120.0), (3, 150.0)] {
        let pole = libm::atan(tan_deg(lat) * sin_deg(d)) * RAD_TO_DEG;
        cusps[house] = ascendant_point(armc + d - 90.0, pole, eps);
    }
    cusps[5] = opposite(cusps[11]);
    cusps[6] = opposite(cusps[12]);
    cusps[8] = opposite(cusps[2]);
    cusps[9] = opposite(cusps[3]);
    cusps
}

/// Campanus: prime vertical divided into 30-degree arcs; each house
/// circle through the north and south horizon points maps to an
/// ascendant problem at the circle's pole.
fn campanus(asc: f64, mc: f64, armc: f64, lat: f64, eps: f64) -> Vec<f64> {
    let mut cusps = angular_skeleton(asc, mc);
    for (house, u) in [(11usize, 60.0f64), (12, 30.0), (2, -30.0), (3, -60.0)] {
        let pole = libm::asin((cos_deg(u) * sin_deg(lat)).clamp(-1.0, 1.0)) * RAD_TO_DEG;
        let meridian_offset = libm::atan2(sin_deg(u), cos_deg(u) * cos_deg(lat)) * RAD_TO_DEG;
        cusps[house] = ascendant_point(armc - meridian_offset, pole, eps);
    }
    cusps[5] = opposite(cusps[11]);
    cusps[6] = opposite(cusps[12]);
    cusps[8] = opposite(cusps[2]);
    cusps[9] = opposite(cusps[3]);
    cusps
}

/// Topocentric (Polich-Page): the Placidus idea in closed form, with
/// intermediate cusps taken at pole latitudes of one and two thirds of
/// `tan(lat)`.
fn topocentric(asc: f64, mc: f64, armc: f64, lat: f64, eps: f64) -> Vec<f64> {
    let pole1 = libm::atan(tan_deg(lat) / 3.0) * RAD_TO_DEG;
    let pole2 = libm::atan(2.0 * tan_deg(lat) / 3.0) * RAD_TO_DEG;

    let mut cusps = angular_skeleton(asc, mc);
    cusps[11] = ascendant_point(armc - 60.0, pole1, eps);
    cusps[12] = ascendant_point(armc - 30.0, pole2, eps);
    cusps[2] = ascendant_point(armc + 30.0, pole2, eps);
    cusps[3] = ascendant_point(armc + 60.0, pole1, eps);
    cusps[5] = opposite(cusps[11]);
    cusps[6] = opposite(cusps[12]);
    cusps[8] = opposite(cusps[2]);
    cusps[9] = opposite(cusps[3]);
    cusps
}

/// Alcabitius: the ascendant's semi-arcs divided into thirds on the
/// equator, projected to the ecliptic along hour circles.
fn alcabitius(asc: f64, mc: f64, armc: f64, lat: f64, eps: f64) -> Vec<f64> {
    let dec_asc = libm::asin(sin_deg(eps) * sin_deg(asc)) * RAD_TO_DEG;
    let sda = semi_diurnal_arc_deg(dec_asc, lat);

    let mut cusps = angular_skeleton(asc, mc);
    cusps[11] = ecliptic_lon_of_ra(armc + sda / 3.0, eps);
    cusps[12] = ecliptic_lon_of_ra(armc + 2.0 * sda / 3.0, eps);
    cusps[2] = ecliptic_lon_of_ra(armc + 60.0 + 2.0 * sda / 3.0, eps);
    cusps[3] = ecliptic_lon_of_ra(armc + 120.0 + sda / 3.0, eps);
    cusps[5] = opposite(cusps[11]);
    cusps[6] = opposite(cusps[12]);
    cusps[8] = opposite(cusps[2]);
    cusps[9] = opposite(cusps[3]);
    cusps
}

/// Morinus: equator divided from the meridian, rotated straight into the
/// ecliptic. Latitude never enters.
fn morinus(armc: f64, eps: f64) -> Vec<f64> {
    let mut cusps = vec![0.0; 13];
    for i in 1..=12 {
        let d = armc + 60.0 + 30.0 * i as f64;
        let (sin_d, cos_d) = sincos(d * DEG_TO_RAD);
        cusps[i] = wrap_deg_0_360(libm::atan2(sin_d * cos_deg(eps), cos_d) * RAD_TO_DEG);
    }
    cusps
}

/// Meridian (axial rotation): hour circles at 30-degree steps from the
/// ARMC, intersected with the ecliptic. Latitude never enters.
fn meridian(armc: f64, eps: f64) -> Vec<f64> {
    let mut cusps = vec![0.0; 13];
    for i in 1..=12 {
        let d = armc + (i as f64 - 10.0) * 30.0;
        cusps[i] = ecliptic_lon_of_ra(d, eps);
    }
    cusps
}

/// Azimuthal (horizontal): vertical circles at 30-degree azimuth steps,
/// intersected with the ecliptic.
fn azimuthal(armc: f64, lat: f64, eps: f64, lst_h: f64) -> Vec<f64> {
    // The ecliptic north pole in the local horizontal frame.
    let pole = equatorial_to_horizontal(18.0, 90.0 - eps, lat, lst_h);
    let tan_hp = tan_deg(pole.altitude_deg);

    let mut cusps = vec![0.0; 13];
    for i in 1..=12 {
        let azimuth = wrap_deg_0_360(90.0 - (i as f64 - 1.0) * 30.0);
        // Point of the ecliptic on this vertical circle.
        let altitude = libm::atan(-cos_deg(azimuth - pole.azimuth_deg) / tan_hp) * RAD_TO_DEG;

        // Back through the horizon frame to equatorial coordinates
        // (azimuth reckoned from south for the textbook inverse).
        let az_south = azimuth - 180.0;
        let hour_angle = libm::atan2(
            sin_deg(az_south),
            cos_deg(az_south) * sin_deg(lat) + tan_deg(altitude) * cos_deg(lat),
        ) * RAD_TO_DEG;
        let dec = libm::asin(
            sin_deg(lat) * sin_deg(altitude)
                - cos_deg(lat) * cos_deg(altitude) * cos_deg(az_south),
        ) * RAD_TO_DEG;
        let ra_hours = wrap_deg_0_360(armc - hour_angle) / 15.0;

        let (lon, _) = equatorial_to_ecliptic(ra_hours, dec, eps);
        cusps[i] = lon;
    }
    cusps
}

/// Gauquelin: 36 sectors, each angular quadrant split ninefold, numbered
/// against the zodiac from the ascendant (the direction of diurnal
/// motion).
fn gauquelin(asc: f64, mc: f64) -> Vec<f64> {
    let dsc = opposite(asc);
    let ic = opposite(mc);

    let mut cusps = vec![0.0; 37];
    let quadrants = [(asc, mc), (mc, dsc), (dsc, ic), (ic, asc)];
    for (q, (from, to)) in quadrants.iter().enumerate() {
        // Sector cusps walk backwards through the zodiac from `from`
        // toward `to`.
        let span = arc_forward_deg(*to, *from);
        for k in 0..9 {
            cusps[1 + q * 9 + k] = wrap_deg_0_360(from - span * k as f64 / 9.0);
        }
    }
    cusps
}

/// Compute cusps and angles for a UT instant, location and system.
pub fn calculate(
    jd_ut: JulianDay,
    location: &GeoLocation,
    system: HouseSystem,
) -> ChartResult<HouseCusps> {
    let lst_h = lst_hours(jd_ut, location.longitude_deg())?;
    let armc = lst_h * 15.0;
    let eps = mean_obliquity_deg(jd_ut.value());
    let lat = location.latitude_deg();

    let asc = ascendant_point(armc, lat, eps);
    let mc = ecliptic_lon_of_ra(armc, eps);

    let polar = lat.abs() > POLAR_LIMIT_DEG;
    let cusps = match system {
        HouseSystem::Equal => equal_from(asc),
        HouseSystem::EqualMc => equal_from(wrap_deg_0_360(mc - 270.0)),
        HouseSystem::WholeSign => equal_from(30.0 * (asc / 30.0).floor()),
        HouseSystem::Vehlow => equal_from(wrap_deg_0_360(asc - 15.0)),
        HouseSystem::Porphyry => porphyry(asc, mc),
        HouseSystem::Placidus => {
            if polar {
                return Err(ChartError::HouseSystemUndefined {
                    system,
                    latitude_deg: lat,
                });
            }
            placidus(asc, mc, armc, lat, eps)
        }
        HouseSystem::Koch => {
            if polar {
                return Err(ChartError::HouseSystemUndefined {
                    system,
                    latitude_deg: lat,
                });
            }
            koch(asc, mc, armc, lat, eps)
        }
        HouseSystem::Regiomontanus => regiomontanus(asc, mc, armc, lat, eps),
        HouseSystem::Campanus => campanus(asc, mc, armc, lat, eps),
        HouseSystem::Alcabitius => {
            if polar {
                porphyry(asc, mc)
            } else {
                alcabitius(asc, mc, armc, lat, eps)
            }
        }
        HouseSystem::Topocentric => {
            if polar {
                porphyry(asc, mc)
            } else {
                topocentric(asc, mc, armc, lat, eps)
            }
        }
        HouseSystem::Morinus => morinus(armc, eps),
        HouseSystem::Meridian => meridian(armc, eps),
        HouseSystem::Azimuthal => azimuthal(armc, lat, eps, lst_h),
        HouseSystem::Gauquelin => gauquelin(asc, mc),
    };

    let angles = ChartAngles {
        ascendant: asc,
        mc,
        armc: wrap_deg_0_360(armc),
        vertex: ascendant_point(armc + 180.0, 90.0 - lat, eps),
        equatorial_ascendant: ascendant_point(armc, 0.0, eps),
        co_ascendant_koch: ascendant_point(armc + 180.0, lat, eps),
        co_ascendant_munkasey: ascendant_point(armc, -lat, eps),
        polar_ascendant: ascendant_point(armc + 180.0, -lat, eps),
    };

    Ok(HouseCusps {
        system,
        cusps,
        angles,
    })
}
