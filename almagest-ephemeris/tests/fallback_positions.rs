//! Engine behavior with no ephemeris files on the search path.

use almagest_ephemeris::{Body, Engine, EphemerisConfig, EphemerisError};
use almagest_time::JulianDay;

fn engine() -> Engine {
    Engine::new(EphemerisConfig::builder().include_builtin(false).build())
}

#[test]
fn sun_longitude_at_j2000() {
    let sun = engine().calculate(Body::Sun, JulianDay::J2000, true).unwrap();
    let sph = sun.spherical();
    assert!(
        (270.0..290.0).contains(&sph.lon_deg),
        "sun longitude = {}",
        sph.lon_deg
    );
    assert!(sph.lat_deg.abs() < 1e-9, "sun latitude = {}", sph.lat_deg);
    assert!(
        (0.98..1.02).contains(&sph.distance),
        "sun distance = {}",
        sph.distance
    );
}

#[test]
fn moon_longitude_speed_at_j2000() {
    let moon = engine().calculate(Body::Moon, JulianDay::J2000, true).unwrap();
    let (_, lon_speed, _, _) = moon.spherical_with_speeds();
    assert!(
        (11.0..15.0).contains(&lon_speed),
        "moon speed = {lon_speed} deg/day"
    );
}

#[test]
fn node_positions_are_available() {
    let engine = engine();
    for body in [Body::MeanNode, Body::TrueNode] {
        let node = engine.calculate(body, JulianDay::J2000, false).unwrap();
        let lon = node.spherical().lon_deg;
        assert!((0.0..360.0).contains(&lon), "{body:?} lon = {lon}");
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let engine = engine();
    for body in [Body::Sun, Body::Moon, Body::MeanNode, Body::TrueNode, Body::Earth] {
        let jd = JulianDay::new(2_455_197.5);
        let first = engine.calculate(body, jd, true).unwrap();
        let second = engine.calculate(body, jd, true).unwrap();
        assert_eq!(first, second, "{body:?} not deterministic");
    }
}

#[test]
fn planets_need_files() {
    let engine = engine();
    for body in [
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ] {
        assert!(
            matches!(
                engine.calculate(body, JulianDay::J2000, false),
                Err(EphemerisError::BodyUnsupported(b)) if b == body
            ),
            "{body:?} should require a data file"
        );
    }
}

#[test]
fn sun_tracks_the_seasons() {
    let engine = engine();
    // Around the 2005 June solstice the Sun sits near longitude 90.
    let jd = JulianDay::from_gregorian(2005, 6, 21, 12.0).unwrap();
    let lon = engine
        .calculate(Body::Sun, jd, false)
        .unwrap()
        .spherical()
        .lon_deg;
    assert!((lon - 90.0).abs() < 1.5, "solstice longitude = {lon}");

    // And near 180 at the September equinox.
    let jd = JulianDay::from_gregorian(2005, 9, 22, 12.0).unwrap();
    let lon = engine
        .calculate(Body::Sun, jd, false)
        .unwrap()
        .spherical()
        .lon_deg;
    assert!((lon - 180.0).abs() < 1.5, "equinox longitude = {lon}");
}
