use crate::test_epoch;
use astraea::cosmic::bodies::MU_EARTH_KM3_S2;
use astraea::cosmic::frames::{
    dcm_ecef_to_eci, dcm_eci_to_ecef, dcm_j2000_to_mod, dcm_mod_to_j2000, ecef_to_geodetic,
    geodetic_haversine, geodetic_to_ecef, azimuth_elevation, subsatellite_point,
    cartesian_to_spherical, spherical_to_cartesian,
};
use astraea::cosmic::{OrbitShape, OrbitalElements, StateVector};
use astraea::linalg::{Matrix3, Vector3};
use astraea::time::Unit;
use std::f64::consts::PI;

#[test]
fn elements_round_trip_generic_orbits() {
    let epoch = test_epoch();
    let cases = [
        // sma, ecc, inc, raan, aop, ta (degrees for readability)
        (8_000.0, 0.1, 30.0, 40.0, 60.0, 30.0),
        (6_778.137, 0.001, 51.6, 250.0, 90.0, 180.1),
        (26_560.0, 0.74, 63.4, 120.0, 270.0, 10.0),
        (42_164.0, 0.0003, 0.05, 75.0, 200.0, 333.0),
        (9_500.0, 0.3, 145.0, 310.0, 44.0, 261.0),
    ];
    for &(sma, ecc, inc, raan, aop, ta) in &cases {
        let elements = OrbitalElements::new(
            sma,
            ecc,
            inc * PI / 180.0,
            raan * PI / 180.0,
            aop * PI / 180.0,
            ta * PI / 180.0,
            epoch,
            MU_EARTH_KM3_S2,
        );
        let state = elements.to_state();
        let back = OrbitalElements::from_state(&state, MU_EARTH_KM3_S2).unwrap();
        let state_back = back.to_state();
        let pos_rel = (state_back.radius_km - state.radius_km).norm() / state.rmag();
        let vel_rel = (state_back.velocity_km_s - state.velocity_km_s).norm() / state.vmag();
        assert!(pos_rel < 1e-8, "sma {sma}: position error {pos_rel}");
        assert!(vel_rel < 1e-9, "sma {sma}: velocity error {vel_rel}");
        approx::assert_relative_eq!(back.sma_km, sma, max_relative = 1e-9);
        approx::assert_abs_diff_eq!(back.ecc, ecc, epsilon = 1e-8);
        approx::assert_abs_diff_eq!(back.inc_rad, inc * PI / 180.0, epsilon = 1e-9);
    }
}

#[test]
fn hyperbolic_elements_round_trip() {
    let elements = OrbitalElements::new(
        -15_000.0,
        1.5,
        0.6,
        1.0,
        2.0,
        0.2,
        test_epoch(),
        MU_EARTH_KM3_S2,
    );
    let state = elements.to_state();
    let back = OrbitalElements::from_state(&state, MU_EARTH_KM3_S2).unwrap();
    assert!((back.sma_km + 15_000.0).abs() < 1e-5);
    assert!((back.ecc - 1.5).abs() < 1e-9);
    assert_eq!(back.classify().shape, OrbitShape::Hyperbolic);
}

#[test]
fn circular_inclined_convention() {
    // e = 0: the argument of periapsis collapses to zero and the anomaly is
    // measured from the node.
    let state = OrbitalElements::new(
        7_000.0,
        0.0,
        0.9,
        1.1,
        0.0,
        0.7,
        test_epoch(),
        MU_EARTH_KM3_S2,
    )
    .to_state();
    let elements = OrbitalElements::from_state(&state, MU_EARTH_KM3_S2).unwrap();
    assert!(elements.ecc < 1e-9);
    assert_eq!(elements.aop_rad, 0.0);
    assert!((elements.raan_rad - 1.1).abs() < 1e-9);
    // The argument of latitude is preserved even though aop was reset.
    assert!((elements.argument_of_latitude_rad() - 0.7).abs() < 1e-7);
}

#[test]
fn equatorial_elliptic_convention() {
    // i = 0: the node collapses, raan goes to zero, and the argument of
    // periapsis becomes the true longitude of periapsis.
    let state = OrbitalElements::new(
        9_000.0,
        0.2,
        0.0,
        0.0,
        1.3,
        0.4,
        test_epoch(),
        MU_EARTH_KM3_S2,
    )
    .to_state();
    let elements = OrbitalElements::from_state(&state, MU_EARTH_KM3_S2).unwrap();
    assert_eq!(elements.raan_rad, 0.0);
    assert!((elements.aop_rad - 1.3).abs() < 1e-9);
    assert!((elements.ta_rad - 0.4).abs() < 1e-9);
    assert!(elements.classify().equatorial);
}

#[test]
fn circular_equatorial_convention() {
    let state = OrbitalElements::new(
        42_164.0,
        0.0,
        0.0,
        0.0,
        0.0,
        2.2,
        test_epoch(),
        MU_EARTH_KM3_S2,
    )
    .to_state();
    let elements = OrbitalElements::from_state(&state, MU_EARTH_KM3_S2).unwrap();
    assert_eq!(elements.raan_rad, 0.0);
    assert_eq!(elements.aop_rad, 0.0);
    // The anomaly degenerates to the true longitude of the position.
    assert!((elements.ta_rad - 2.2).abs() < 1e-9);
    let class = elements.classify();
    assert_eq!(class.shape, OrbitShape::Circular);
    assert!(class.equatorial);
    assert!(!class.retrograde);
}

#[test]
fn retrograde_classification() {
    let elements = OrbitalElements::new(
        7_178.0,
        0.001,
        98.6 * PI / 180.0,
        0.0,
        0.0,
        0.0,
        test_epoch(),
        MU_EARTH_KM3_S2,
    );
    assert!(elements.classify().retrograde);
    assert!(!elements.classify().equatorial);
}

#[test]
fn eci_ecef_idempotence() {
    for days in [0.0, 0.3, 120.7] {
        let epoch = test_epoch() + days * Unit::Day;
        let should_be_eye = dcm_eci_to_ecef(epoch) * dcm_ecef_to_eci(epoch);
        assert!(
            (should_be_eye - Matrix3::identity()).norm() < 1e-14,
            "day {days}"
        );
    }
}

#[test]
fn precession_idempotence() {
    let epoch = test_epoch() + 3_650.0 * Unit::Day;
    let should_be_eye = dcm_j2000_to_mod(epoch) * dcm_mod_to_j2000(epoch);
    assert!((should_be_eye - Matrix3::identity()).norm() < 1e-14);
    // Ten years of precession moves the equinox by about 0.14 degrees.
    let x = dcm_j2000_to_mod(epoch) * Vector3::new(1.0, 0.0, 0.0);
    let angle = x.dot(&Vector3::new(1.0, 0.0, 0.0)).acos().to_degrees();
    assert!((angle - 0.14).abs() < 0.02, "{angle}");
}

#[test]
fn geodetic_round_trip() {
    let cases = [
        (28.5_f64, -80.6_f64, 0.003_f64),
        (-33.9, 18.4, 1.2),
        (0.0, 0.0, 400.0),
        (71.3, -156.8, 0.01),
        (-89.9, 100.0, 2.0),
    ];
    for &(lat_deg, lon_deg, alt_km) in &cases {
        let lat = lat_deg * PI / 180.0;
        let lon = lon_deg * PI / 180.0;
        let ecef = geodetic_to_ecef(lat, lon, alt_km);
        let (lat2, lon2, alt2) = ecef_to_geodetic(&ecef);
        assert!((lat2 - lat).abs() < 1e-9, "lat {lat_deg}");
        assert!((lon2 - lon).abs() < 1e-9, "lon {lon_deg}");
        assert!((alt2 - alt_km).abs() < 1e-6, "alt {alt_km}: {alt2}");
    }
}

#[test]
fn haversine_quarter_circle() {
    let quarter = geodetic_haversine(0.0, 0.0, 0.0, PI / 2.0);
    assert!((quarter - 6_378.137 * PI / 2.0).abs() < 1e-6);
    // Symmetry
    let there = geodetic_haversine(0.4, -1.0, -0.7, 2.0);
    let back = geodetic_haversine(-0.7, 2.0, 0.4, -1.0);
    assert!((there - back).abs() < 1e-9);
}

#[test]
fn spherical_round_trip() {
    let v = Vector3::new(-3_000.0, 5_000.0, 2_000.0);
    let (rmag, ra, dec) = cartesian_to_spherical(&v);
    let back = spherical_to_cartesian(rmag, ra, dec);
    assert!((back - v).norm() < 1e-9);
}

#[test]
fn zenith_target_elevation() {
    let epoch = test_epoch();
    let lat = 10.0 * PI / 180.0;
    let lon = 45.0 * PI / 180.0;
    // Put a target 500 km straight above the site, then rotate it into ECI for
    // the lookup to undo.
    let target_ecef = geodetic_to_ecef(lat, lon, 500.0);
    let target_eci = dcm_ecef_to_eci(epoch) * target_ecef;
    let (_, elevation, range) = azimuth_elevation((lat, lon, 0.0), &target_eci, epoch);
    assert!((elevation - PI / 2.0).abs() < 1e-6, "{elevation}");
    assert!((range - 500.0).abs() < 1e-6);
}

#[test]
fn subsatellite_point_equatorial() {
    let epoch = test_epoch();
    // A state on the equatorial plane maps to zero latitude.
    let state = StateVector::cartesian(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.0, epoch);
    let (lat, lon) = subsatellite_point(&state);
    assert!(lat.abs() < 1e-9);
    assert!((-PI..=PI).contains(&lon));
}
