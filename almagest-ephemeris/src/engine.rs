//! The ephemeris engine: maps (body, JD) to a position through whichever
//! data source covers the request.
//!
//! Source order: an attached JPL file, then segmented SE1 files resolved
//! through the search-path configuration, then the analytic series for
//! the Sun, Moon and nodes. A body no source covers is an error, not a
//! guess.

use crate::analytic;
use crate::body::Body;
use crate::chebyshev;
use crate::config::{se1_file_name, EphemerisConfig, PathResolver};
use crate::error::{EphemerisError, EphemerisResult};
use crate::jpl::{table, JplReader};
use crate::position::{BodyPosition, CoordinateType, ReferenceFrame};
use crate::se1::{Se1Reader, Se1Record};
use almagest_coords::spherical::Ecliptic;
use almagest_coords::spherical_state_to_cartesian;
use almagest_time::JulianDay;
use std::cell::RefCell;
use std::collections::HashMap;

/// JPL index-table row for a body; `None` when the format has no row for
/// it (Earth is derived, the nodes are analytic).
fn jpl_table_index(body: Body) -> Option<usize> {
    match body {
        Body::Sun => Some(table::SUN),
        Body::Moon => Some(table::MOON),
        Body::Mercury => Some(table::MERCURY),
        Body::Venus => Some(table::VENUS),
        Body::Mars => Some(table::MARS),
        Body::Jupiter => Some(table::JUPITER),
        Body::Saturn => Some(table::SATURN),
        Body::Uranus => Some(table::URANUS),
        Body::Neptune => Some(table::NEPTUNE),
        Body::Pluto => Some(table::PLUTO),
        Body::Earth | Body::MeanNode | Body::TrueNode => None,
    }
}

/// SE1 file prefix for a body.
fn se1_prefix(body: Body) -> &'static str {
    match body {
        Body::Moon => "semo",
        _ => "sepl",
    }
}

/// Geocentric position engine.
///
/// Owns the source configuration and per-file readers. The reader caches
/// make the engine `!Sync`; for threaded use give each thread its own
/// clone.
#[derive(Debug)]
pub struct Engine {
    resolver: PathResolver,
    jpl: Option<JplReader>,
    se1_readers: RefCell<HashMap<String, Se1Reader>>,
}

impl Clone for Engine {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            jpl: self.jpl.clone(),
            se1_readers: RefCell::new(HashMap::new()),
        }
    }
}

impl Engine {
    /// Engine over a search-path configuration, no JPL file attached.
    pub fn new(config: EphemerisConfig) -> Self {
        Self {
            resolver: PathResolver::new(config),
            jpl: None,
            se1_readers: RefCell::new(HashMap::new()),
        }
    }

    /// Engine with an explicitly opened JPL file.
    pub fn with_jpl(config: EphemerisConfig, jpl: JplReader) -> Self {
        Self {
            resolver: PathResolver::new(config),
            jpl: Some(jpl),
            se1_readers: RefCell::new(HashMap::new()),
        }
    }

    pub fn jpl(&self) -> Option<&JplReader> {
        self.jpl.as_ref()
    }

    /// Compute a geocentric position at a TT Julian Date and project it
    /// into the requested frame.
    ///
    /// Of-date frames rotate across the mean obliquity of date; the fixed
    /// frames use the J2000 obliquity.
    pub fn calculate_in_frame(
        &self,
        body: Body,
        jd_tt: JulianDay,
        frame: ReferenceFrame,
        want_velocity: bool,
    ) -> EphemerisResult<BodyPosition> {
        let native = self.calculate(body, jd_tt, want_velocity)?;
        let obliquity = match frame {
            ReferenceFrame::MeanOfDate | ReferenceFrame::TrueOfDate => {
                almagest_coords::mean_obliquity_deg(jd_tt.value())
            }
            _ => almagest_core::constants::OBLIQUITY_J2000_DEG,
        };
        Ok(native.to_frame(frame, obliquity))
    }

    /// Compute a geocentric position at a TT Julian Date.
    pub fn calculate(
        &self,
        body: Body,
        jd_tt: JulianDay,
        want_velocity: bool,
    ) -> EphemerisResult<BodyPosition> {
        let jd = jd_tt.value();

        // The geocenter itself: zero by definition, whatever the source.
        if body == Body::Earth {
            return Ok(BodyPosition {
                body,
                jd,
                position: [0.0; 3],
                velocity: want_velocity.then_some([0.0; 3]),
                frame: ReferenceFrame::Ecliptic,
                coordinates: CoordinateType::Geocentric,
            });
        }

        if let Some(result) = self.try_jpl(body, jd, want_velocity)? {
            return Ok(result);
        }
        if let Some(result) = self.try_se1(body, jd, want_velocity)? {
            return Ok(result);
        }

        let state = analytic::body_position(body, jd)?;
        Ok(self.from_ecliptic_state(body, jd, state, want_velocity))
    }

    fn from_ecliptic_state(
        &self,
        body: Body,
        jd: f64,
        state: analytic::EclipticState,
        want_velocity: bool,
    ) -> BodyPosition {
        let sph = Ecliptic {
            lon_deg: state.lon_deg,
            lat_deg: state.lat_deg,
            distance: state.dist_au,
        };
        let (position, velocity) = spherical_state_to_cartesian(
            &sph,
            state.lon_speed_deg,
            state.lat_speed_deg,
            state.dist_speed_au,
        );
        BodyPosition {
            body,
            jd,
            position,
            velocity: want_velocity.then_some(velocity),
            frame: ReferenceFrame::Ecliptic,
            coordinates: CoordinateType::Geocentric,
        }
    }

    fn try_jpl(
        &self,
        body: Body,
        jd: f64,
        want_velocity: bool,
    ) -> EphemerisResult<Option<BodyPosition>> {
        let Some(jpl) = &self.jpl else {
            return Ok(None);
        };
        let Some(row) = jpl_table_index(body) else {
            return Ok(None);
        };
        if !jpl.covers(jd) {
            return Ok(None);
        }

        let au = jpl.header().au_km;
        let (pos_km, vel_km) = if body == Body::Moon {
            // The Moon row is geocentric already.
            jpl.state(table::MOON, jd)?
        } else {
            let (body_pos, body_vel) = jpl.state(row, jd)?;
            let (earth_pos, earth_vel) = jpl.earth_state(jd)?;
            (
                [
                    body_pos[0] - earth_pos[0],
                    body_pos[1] - earth_pos[1],
                    body_pos[2] - earth_pos[2],
                ],
                [
                    body_vel[0] - earth_vel[0],
                    body_vel[1] - earth_vel[1],
                    body_vel[2] - earth_vel[2],
                ],
            )
        };

        Ok(Some(BodyPosition {
            body,
            jd,
            position: [pos_km[0] / au, pos_km[1] / au, pos_km[2] / au],
            velocity: want_velocity.then_some([
                vel_km[0] / au,
                vel_km[1] / au,
                vel_km[2] / au,
            ]),
            frame: ReferenceFrame::Icrf,
            coordinates: CoordinateType::Geocentric,
        }))
    }

    /// Candidate SE1 file, by the century of the requested year with the
    /// neighbours as fallback for dates near a century boundary.
    fn se1_record(&self, body: Body, jd: f64) -> EphemerisResult<Option<Se1Record>> {
        if body.is_node() {
            return Ok(None);
        }
        let year = JulianDay::new(jd).to_gregorian().year;
        let prefix = se1_prefix(body);
        for year_probe in [year, year - 100, year + 100] {
            let name = se1_file_name(prefix, year_probe);
            let Some(reader) = self.open_se1(&name)? else {
                continue;
            };
            if !reader.covers(jd) {
                continue;
            }
            if let Some(record) = reader.find_record(jd)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    fn open_se1(&self, name: &str) -> EphemerisResult<Option<Se1Reader>> {
        if let Some(reader) = self.se1_readers.borrow().get(name) {
            return Ok(Some(reader.clone()));
        }
        let path = match self.resolver.find_file(name) {
            Ok(path) => path,
            Err(EphemerisError::FileNotFound { .. })
            | Err(EphemerisError::ConfigurationInvalid(_)) => return Ok(None),
            Err(other) => return Err(other),
        };
        let reader = Se1Reader::open(path)?;
        self.se1_readers
            .borrow_mut()
            .insert(name.to_string(), reader.clone());
        Ok(Some(reader))
    }

    fn try_se1(
        &self,
        body: Body,
        jd: f64,
        want_velocity: bool,
    ) -> EphemerisResult<Option<BodyPosition>> {
        let Some(record) = self.se1_record(body, jd)? else {
            return Ok(None);
        };

        let x = chebyshev::normalize(jd, record.start_jd, record.end_jd)?;
        let rate = 2.0 / (record.end_jd - record.start_jd);

        let (lon, dlon) = chebyshev::evaluate_both(x, &record.lon_coeffs)?;
        let (lat, dlat) = chebyshev::evaluate_both(x, &record.lat_coeffs)?;
        let (dist, ddist) = chebyshev::evaluate_both(x, &record.dist_coeffs)?;

        let sph = Ecliptic {
            lon_deg: almagest_core::angle::wrap_deg_0_360(lon),
            lat_deg: lat,
            distance: dist,
        };
        let (position, velocity) =
            spherical_state_to_cartesian(&sph, dlon * rate, dlat * rate, ddist * rate);

        Ok(Some(BodyPosition {
            body,
            jd,
            position,
            velocity: want_velocity.then_some(velocity),
            frame: ReferenceFrame::Ecliptic,
            coordinates: CoordinateType::Geocentric,
        }))
    }
}
